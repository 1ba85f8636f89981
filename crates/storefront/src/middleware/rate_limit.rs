//! Rate limiting middleware using governor and `tower_governor`.
//!
//! One limiter covers the whole API: each client IP gets a budget of
//! `RATE_LIMIT_MAX` requests that refills evenly over `RATE_LIMIT_WINDOW_SECS`.
//! Exhausting it yields `429 Too Many Requests`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderName, Request, StatusCode, header::RETRY_AFTER};
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::config::RateLimitConfig;
use crate::error::AppError;

const X_RATELIMIT_AFTER: HeaderName = HeaderName::from_static("x-ratelimit-after");

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that trusts proxy headers first (Cloudflare, then the
/// standard forwarding headers, then Fly.io), and falls back to the TCP peer
/// address when the server runs without a proxy.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        ["cf-connecting-ip", "x-forwarded-for", "x-real-ip", "fly-client-ip"]
            .into_iter()
            .find_map(|name| header_ip(req, name))
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the per-IP API rate limiter.
///
/// The whole budget is available as a burst; one request is regained every
/// `window / max_requests`. Returns `None` if governor rejects the settings
/// (a zero replenish interval or burst size).
#[must_use]
pub fn api_rate_limiter(config: &RateLimitConfig) -> Option<RateLimiterLayer> {
    let governor = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .period(config.replenish_interval())
        .burst_size(config.max_requests)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(governor)))
}

/// Rewrite the limiter's plain-text 429 as the API's JSON error, keeping its
/// retry headers.
pub async fn rate_limit_response(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let mut json = AppError::RateLimited.into_response();
    for name in [RETRY_AFTER, X_RATELIMIT_AFTER] {
        if let Some(value) = response.headers().get(&name) {
            json.headers_mut().insert(name, value.clone());
        }
    }
    json
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/health");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_prefers_cloudflare_header() {
        let req = request(&[
            ("x-forwarded-for", "203.0.113.9"),
            ("cf-connecting-ip", "198.51.100.7"),
        ]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "198.51.100.7");
    }

    #[test]
    fn test_first_forwarded_address() {
        let req = request(&[("x-forwarded-for", "203.0.113.9, 10.0.0.1")]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.9");
    }

    #[test]
    fn test_invalid_header_falls_through() {
        let req = request(&[("x-forwarded-for", "unknown"), ("x-real-ip", "192.0.2.4")]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.4");
    }

    #[test]
    fn test_peer_address_fallback() {
        let mut req = request(&[]);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 50_000))));
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_no_address_is_an_error() {
        let req = request(&[]);
        assert!(ClientIpKeyExtractor.extract(&req).is_err());
    }

    #[test]
    fn test_limiter_builds_from_defaults() {
        assert!(api_rate_limiter(&RateLimitConfig::default()).is_some());
    }

    #[tokio::test]
    async fn test_rate_limit_response_is_json() {
        let limited = Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .header(RETRY_AFTER, "9")
            .body(axum::body::Body::from("Too Many Requests! Wait for 9s"))
            .unwrap();

        let response = rate_limit_response(limited).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "9");
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
