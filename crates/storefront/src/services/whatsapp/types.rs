//! WhatsApp Cloud API request and response bodies.

use serde::{Deserialize, Serialize};

/// `POST /{phone-number-id}/messages` body for a plain text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMessage<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: TextBody<'a>,
}

impl<'a> TextMessage<'a> {
    /// A text message to `to`.
    #[must_use]
    pub const fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        }
    }
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBody<'a> {
    pub body: &'a str,
}

/// Successful send response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// ID of an accepted message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// Graph API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Graph API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}
