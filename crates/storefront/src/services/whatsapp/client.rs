//! WhatsApp Cloud API client.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::types::{ErrorResponse, SendMessageResponse, TextMessage};
use crate::config::WhatsAppConfig;
use crate::services::transport::{DeliveryReceipt, MessageTransport, TransportError};

/// Sends text messages from the shop's WhatsApp Business number.
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client with the send timeout applied.
    client: Client,
    /// Fully resolved `/{phone-number-id}/messages` endpoint.
    messages_url: String,
    /// Bearer token for authentication.
    access_token: SecretString,
    /// Number that receives notifications.
    recipient: String,
}

impl std::fmt::Debug for WhatsAppClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppClient")
            .field("messages_url", &self.messages_url)
            .field("access_token", &"[REDACTED]")
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl WhatsAppClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Config`] if the HTTP client fails to build.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            messages_url: format!(
                "{}/{}/messages",
                config.api_base.as_str().trim_end_matches('/'),
                config.phone_number_id
            ),
            access_token: config.access_token.clone(),
            recipient: config.recipient_phone.clone(),
        })
    }

    /// The endpoint messages are posted to.
    #[must_use]
    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }
}

/// Map a reqwest failure, keeping timeouts distinct.
fn request_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Pull `error.message` out of a Graph API error body, falling back to the
/// raw body.
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl MessageTransport for WhatsAppClient {
    #[instrument(skip(self, body), fields(chars = body.chars().count()))]
    async fn send_text(&self, body: &str) -> Result<DeliveryReceipt, TransportError> {
        let message = TextMessage::new(&self.recipient, body);

        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&message)
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| request_error(&e))?;

        if !status.is_success() {
            let message = api_error_message(status, &text);
            error!(
                status = status.as_u16(),
                error = %message,
                "WhatsApp API error sending message"
            );
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendMessageResponse =
            serde_json::from_str(&text).map_err(|e| TransportError::Response(e.to_string()))?;
        let message_id = parsed.messages.into_iter().next().map(|m| m.id);

        debug!(message_id = ?message_id, "Message accepted by WhatsApp");

        Ok(DeliveryReceipt { message_id })
    }
}
