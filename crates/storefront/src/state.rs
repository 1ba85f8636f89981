//! Application state shared across handlers.

use std::sync::Arc;

use icedelights_core::{Catalog, ShippingPolicy};

use crate::config::StorefrontConfig;
use crate::services::{MessageTransport, OrderRelay};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, product catalog, and order relay.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    relay: OrderRelay,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Products offered for sale
    /// * `transport` - Delivery channel for order and contact notifications
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        transport: Arc<dyn MessageTransport>,
    ) -> Self {
        let relay = OrderRelay::new(transport, config.whatsapp.timeout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                relay,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order relay.
    #[must_use]
    pub fn relay(&self) -> &OrderRelay {
        &self.inner.relay
    }

    /// The shipping rule applied to session carts.
    #[must_use]
    pub fn shipping_policy(&self) -> ShippingPolicy {
        self.inner.config.shipping
    }
}
