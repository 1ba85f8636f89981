//! External services used by the storefront.
//!
//! # Services
//!
//! - `transport` - The [`MessageTransport`] seam and its error type
//! - `whatsapp` - WhatsApp Cloud API client implementing the transport
//! - `relay` - Validate, format, and deliver contact/order submissions

pub mod relay;
pub mod transport;
pub mod whatsapp;

pub use relay::{OrderRelay, RelayError, RelayResult, RelayStage};
pub use transport::{DeliveryReceipt, MessageTransport, TransportError};
pub use whatsapp::WhatsAppClient;
