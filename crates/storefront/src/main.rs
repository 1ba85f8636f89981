//! IceDelights Storefront - cart, checkout, and order relay API.
//!
//! This binary serves the JSON API behind the IceDelights single-page
//! storefront on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - Session carts held in memory via tower-sessions
//! - WhatsApp Cloud API for order and contact notifications
//!
//! # Security
//!
//! - Per-IP rate limiting (governor)
//! - CORS restricted to `ALLOWED_ORIGINS`
//! - 10 KiB request bodies
//! - Free text is validated and stripped of markup before it is sent

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use icedelights_core::Catalog;
use icedelights_storefront::config::StorefrontConfig;
use icedelights_storefront::middleware::{api_rate_limiter, rate_limit_response};
use icedelights_storefront::services::WhatsAppClient;
use icedelights_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "icedelights_storefront=info,icedelights_core=info,tower_http=debug".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let whatsapp =
        WhatsAppClient::new(&config.whatsapp).expect("Failed to create WhatsApp client");
    tracing::info!(
        endpoint = whatsapp.messages_url(),
        timeout_ms = config.whatsapp.timeout.as_millis(),
        "WhatsApp client ready"
    );

    let state = AppState::new(config.clone(), Catalog::default(), Arc::new(whatsapp));

    let rate_limiter =
        api_rate_limiter(&config.rate_limit).expect("Failed to create rate limiter");
    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Rate limiting enabled"
    );

    let app = icedelights_storefront::app(state)
        .layer(rate_limiter)
        .layer(axum::middleware::map_response(rate_limit_response))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Peer addresses feed the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
