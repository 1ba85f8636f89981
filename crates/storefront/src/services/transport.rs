//! Outbound message delivery seam.
//!
//! The relay only needs "send this text to the shop"; the WhatsApp client is
//! one implementation, and tests substitute their own.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a single delivery attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("Message request failed: {0}")]
    Request(String),

    /// The request did not complete in time.
    #[error("Message request timed out")]
    Timeout,

    /// The API answered with a non-success status.
    #[error("Message API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API answered 2xx but the body was not understood.
    #[error("Message response error: {0}")]
    Response(String),

    /// The transport is not usable with the given settings.
    #[error("Message transport configuration error: {0}")]
    Config(String),
}

impl TransportError {
    /// Text safe to show callers: the provider's own error message where there
    /// is one.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Confirmation returned by a successful delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Provider-assigned message ID, when the provider returns one.
    pub message_id: Option<String>,
}

/// Sends plain-text notifications to the shop.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Deliver `body` once. Implementations must not retry.
    async fn send_text(&self, body: &str) -> Result<DeliveryReceipt, TransportError>;
}
