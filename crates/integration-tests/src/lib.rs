//! Integration tests for the IceDelights storefront.
//!
//! These tests talk to a running server over HTTP and are `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront (WhatsApp credentials required)
//! cargo run -p icedelights-storefront
//!
//! # Run integration tests against it
//! STOREFRONT_URL=http://localhost:3001 cargo test -p icedelights-integration-tests -- --ignored
//! ```
//!
//! Tests that would deliver a real WhatsApp message only run when
//! `INTEGRATION_SEND_MESSAGES=1` is set.

use std::time::Duration;

/// Storefront address used when `STOREFRONT_URL` is unset.
pub const DEFAULT_STOREFRONT_URL: &str = "http://localhost:3001";

/// HTTP client and base URL for one test.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
}

impl TestContext {
    /// Build a context with its own cookie jar, so each test gets a fresh
    /// session cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(40))
            .build()?;
        let storefront_url = std::env::var("STOREFRONT_URL")
            .unwrap_or_else(|_| DEFAULT_STOREFRONT_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            storefront_url,
        })
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }
}

/// Whether tests may send real WhatsApp messages.
#[must_use]
pub fn may_send_messages() -> bool {
    std::env::var("INTEGRATION_SEND_MESSAGES").is_ok_and(|v| v == "1")
}
