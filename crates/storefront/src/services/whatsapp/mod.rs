//! WhatsApp Business (Cloud API) integration.
//!
//! Order and contact notifications are delivered as plain text messages to
//! the shop's own number.

mod client;
mod types;

pub use client::WhatsAppClient;
pub use types::{
    ErrorDetail, ErrorResponse, MessageRef, SendMessageResponse, TextBody, TextMessage,
};
