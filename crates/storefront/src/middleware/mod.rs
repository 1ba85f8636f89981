//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Rate limit response rewrite (JSON 429)
//! 3. Rate limiting (governor, per client IP)
//! 4. `TraceLayer` (request span with `request_id` field)
//! 5. Request ID (record in span, Sentry scope, response header)
//! 6. CORS (`ALLOWED_ORIGINS`)
//! 7. Security headers
//! 8. Body limit (10 KiB JSON)
//! 9. Session layer (tower-sessions, bounded in-memory store)
//!
//! The rate limiter and Sentry layers are added by the binary; the router
//! built by [`crate::routes::app`] carries the rest.

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use rate_limit::{
    ClientIpKeyExtractor, RateLimiterLayer, api_rate_limiter, rate_limit_response,
};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{CartSessionStore, create_session_layer};
