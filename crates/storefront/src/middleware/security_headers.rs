//! Security headers middleware.
//!
//! The API is called cross-origin by the storefront SPA, so the policy here
//! protects responses that a browser might render directly (errors, JSON
//! opened in a tab) without getting in the way of CORS `fetch` calls.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
            X_CONTENT_TYPE_OPTIONS, X_DNS_PREFETCH_CONTROL, X_FRAME_OPTIONS, X_XSS_PROTECTION,
        },
    },
    middleware::Next,
    response::Response,
};

/// Content Security Policy sent with every response.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'self'; \
     base-uri 'self'; \
     font-src 'self' https: data:; \
     form-action 'self'; \
     frame-ancestors 'self'; \
     img-src 'self' data: https:; \
     object-src 'none'; \
     script-src 'self'; \
     script-src-attr 'none'; \
     style-src 'self' 'unsafe-inline'; \
     upgrade-insecure-requests";

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy` - see [`CONTENT_SECURITY_POLICY_VALUE`]
/// - `Strict-Transport-Security: max-age=31536000; includeSubDomains`
/// - `X-Frame-Options: SAMEORIGIN`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Cross-Origin-Opener-Policy: same-origin`
/// - `Cross-Origin-Resource-Policy: same-origin`
/// - `Origin-Agent-Cluster: ?1`
/// - `X-DNS-Prefetch-Control: off`
/// - `X-Download-Options: noopen`
/// - `X-Permitted-Cross-Domain-Policies: none`
/// - `X-XSS-Protection: 0` (disables the legacy auditor)
///
/// No `Cross-Origin-Embedder-Policy` is sent; product images are served from
/// other origins without CORP headers.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(
        STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("origin-agent-cluster"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off"));
    headers.insert(
        HeaderName::from_static("x-download-options"),
        HeaderValue::from_static("noopen"),
    );
    headers.insert(
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        HeaderValue::from_static("none"),
    );
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("0"));

    response
}
