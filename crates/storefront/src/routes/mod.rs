//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Relay API
//! GET  /api/health             - Liveness check
//! POST /api/send-order         - Relay an order notification
//! POST /api/send-contact       - Relay a contact message
//!
//! # Catalog
//! GET  /api/products           - Product listing (?category=)
//! GET  /api/products/{id}      - Product detail
//! GET  /api/categories         - Category names
//!
//! # Cart (session)
//! GET  /cart                   - Cart with groups and totals
//! POST /cart/add               - Add a product
//! POST /cart/update            - Set a quantity
//! POST /cart/remove            - Remove a product
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Item count badge
//!
//! # Checkout
//! POST /checkout               - Place the order and notify the shop
//! ```
//!
//! Anything else answers `404 {"error": "Not found"}`.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod products;

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request, Response, header},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Largest accepted request body.
pub const JSON_BODY_LIMIT: usize = 10 * 1024;

/// Create the relay and catalog API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(api::health))
        .route("/send-order", post(api::send_order))
        .route("/send-contact", post(api::send_contact))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place_order))
        .fallback(not_found)
}

/// Unknown route.
async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// CORS for the storefront SPA origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Build the application with its per-request middleware.
///
/// Rate limiting and Sentry are left to the caller so tests can drive the
/// router without a peer address.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let session_layer = create_session_layer(config);
    let cors = cors_layer(&config.allowed_origins);

    routes()
        .layer(session_layer)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
