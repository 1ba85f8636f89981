//! Order relay: validate, format, and deliver one submission.
//!
//! Each call moves through `Received → Validated → Formatted → Sent` and ends
//! in `Succeeded` or `Failed`. Every transition is logged under the
//! `relay` span. There is exactly one delivery attempt per call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use icedelights_core::{Submission, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use super::transport::{DeliveryReceipt, MessageTransport, TransportError};

/// Why a submission was not delivered.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The submission failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The transport failed or the API rejected the message.
    #[error("{}", .0.detail())]
    Transport(TransportError),

    /// No answer within the configured bound.
    #[error("Message delivery timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Stage of a relay call, recorded in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Received,
    Validated,
    Formatted,
    Sent,
    Succeeded,
    Failed,
}

impl fmt::Display for RelayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Formatted => "formatted",
            Self::Sent => "sent",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome reported to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResult {
    /// A delivered message.
    #[must_use]
    pub fn delivered(receipt: DeliveryReceipt) -> Self {
        Self {
            success: true,
            message_id: receipt.message_id,
            error: None,
        }
    }

    /// A failed delivery with its caller-facing detail.
    #[must_use]
    pub fn failed(error: &RelayError) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<DeliveryReceipt, RelayError>> for RelayResult {
    fn from(outcome: Result<DeliveryReceipt, RelayError>) -> Self {
        match outcome {
            Ok(receipt) => Self::delivered(receipt),
            Err(err) => Self::failed(&err),
        }
    }
}

/// Validates submissions and hands the formatted text to a transport.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct OrderRelay {
    transport: Arc<dyn MessageTransport>,
    timeout: Duration,
}

impl fmt::Debug for OrderRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderRelay")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OrderRelay {
    /// Create a relay that bounds each delivery by `timeout`.
    #[must_use]
    pub fn new(transport: Arc<dyn MessageTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// The per-delivery time bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate, format, and deliver a submission.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Validation`] if any field fails; the transport is not
    ///   called.
    /// - [`RelayError::Timeout`] if delivery does not finish in time.
    /// - [`RelayError::Transport`] for any other delivery failure.
    #[instrument(name = "relay", skip_all, fields(kind = submission.kind()))]
    pub async fn relay(&self, submission: &Submission) -> Result<DeliveryReceipt, RelayError> {
        debug!(stage = %RelayStage::Received, "Submission received");

        let valid = match submission.validate() {
            Ok(valid) => valid,
            Err(err) => {
                warn!(
                    stage = %RelayStage::Failed,
                    fields = ?err.field_names().collect::<Vec<_>>(),
                    "Submission failed validation"
                );
                return Err(err.into());
            }
        };
        debug!(stage = %RelayStage::Validated, "Submission validated");

        let text = valid.render();
        debug!(
            stage = %RelayStage::Formatted,
            chars = text.chars().count(),
            "Notification formatted"
        );

        debug!(stage = %RelayStage::Sent, "Sending notification");
        let outcome = tokio::time::timeout(self.timeout, self.transport.send_text(&text)).await;

        match outcome {
            Ok(Ok(receipt)) => {
                info!(
                    stage = %RelayStage::Succeeded,
                    message_id = ?receipt.message_id,
                    "Notification delivered"
                );
                Ok(receipt)
            }
            Ok(Err(TransportError::Timeout)) | Err(_) => {
                warn!(
                    stage = %RelayStage::Failed,
                    timeout_ms = self.timeout.as_millis(),
                    "Notification timed out"
                );
                Err(RelayError::Timeout(self.timeout))
            }
            Ok(Err(err)) => {
                error!(stage = %RelayStage::Failed, error = %err, "Notification failed");
                Err(RelayError::Transport(err))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use icedelights_core::{ContactForm, ContactSubmission};
    use tokio::sync::Mutex;

    use super::*;

    enum Behavior {
        Accept,
        Reject,
        Hang,
        TimeOut,
    }

    struct MockTransport {
        behavior: Behavior,
        calls: AtomicUsize,
        last_body: Mutex<Option<String>>,
    }

    impl MockTransport {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
                last_body: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl MessageTransport for MockTransport {
        async fn send_text(&self, body: &str) -> Result<DeliveryReceipt, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_body.lock().await = Some(body.to_string());
            match self.behavior {
                Behavior::Accept => Ok(DeliveryReceipt {
                    message_id: Some("wamid.TEST".to_string()),
                }),
                Behavior::Reject => Err(TransportError::Api {
                    status: 401,
                    message: "Invalid OAuth access token.".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(DeliveryReceipt::default())
                }
                Behavior::TimeOut => Err(TransportError::Timeout),
            }
        }
    }

    fn contact(message: &str) -> Submission {
        Submission::Contact(ContactSubmission {
            form: ContactForm {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-0100".to_string(),
                message: message.to_string(),
            },
        })
    }

    #[tokio::test]
    async fn test_delivers_formatted_contact() {
        let transport = MockTransport::new(Behavior::Accept);
        let relay = OrderRelay::new(transport.clone(), Duration::from_secs(5));

        let receipt = relay.relay(&contact("<b>Hi</b> there")).await.unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("wamid.TEST"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        let body = transport.last_body.lock().await.clone().unwrap();
        assert!(body.starts_with("📩 *NEW CONTACT MESSAGE*"));
        assert!(body.contains("bHi/b there"));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_transport() {
        let transport = MockTransport::new(Behavior::Accept);
        let relay = OrderRelay::new(transport.clone(), Duration::from_secs(5));

        let err = relay.relay(&contact("   ")).await.unwrap_err();

        match err {
            RelayError::Validation(validation) => assert!(validation.has_field("message")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_api_error_detail_is_reported() {
        let relay = OrderRelay::new(MockTransport::new(Behavior::Reject), Duration::from_secs(5));

        let err = relay.relay(&contact("Hello")).await.unwrap_err();

        assert!(matches!(err, RelayError::Transport(TransportError::Api { status: 401, .. })));
        assert_eq!(err.to_string(), "Invalid OAuth access token.");
        let result = RelayResult::failed(&err);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Invalid OAuth access token."));
    }

    #[tokio::test]
    async fn test_slow_transport_times_out() {
        let transport = MockTransport::new(Behavior::Hang);
        let relay = OrderRelay::new(transport.clone(), Duration::from_millis(50));

        let err = relay.relay(&contact("Hello")).await.unwrap_err();

        assert!(matches!(err, RelayError::Timeout(d) if d == Duration::from_millis(50)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_timeout_maps_to_timeout() {
        let relay = OrderRelay::new(MockTransport::new(Behavior::TimeOut), Duration::from_secs(5));

        let err = relay.relay(&contact("Hello")).await.unwrap_err();

        assert!(matches!(err, RelayError::Timeout(_)));
    }

    #[test]
    fn test_relay_result_json() {
        let ok = RelayResult::delivered(DeliveryReceipt {
            message_id: Some("wamid.1".to_string()),
        });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"success": true, "messageId": "wamid.1"})
        );

        let failed = RelayResult::from(Err(RelayError::Timeout(Duration::from_millis(250))));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"success": false, "error": "Message delivery timed out after 250ms"})
        );
    }
}
