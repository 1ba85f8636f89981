//! Order relay API.
//!
//! `send-order` and `send-contact` validate the submitted form, format the
//! WhatsApp notification, and deliver it once. The response reports whether
//! WhatsApp accepted the message.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chrono::{DateTime, SecondsFormat, Utc};
use icedelights_core::{ContactSubmission, OrderSubmission, Submission};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::services::RelayResult;
use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

impl HealthResponse {
    fn at(now: DateTime<Utc>) -> Self {
        Self {
            status: "ok",
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Liveness health check.
///
/// Returns `{"status": "ok", "timestamp": ...}` if the server is running.
/// Does not contact WhatsApp.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::at(Utc::now()))
}

/// Relay a checkout order to the shop.
///
/// POST /api/send-order
#[instrument(skip(state, payload))]
pub async fn send_order(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderSubmission>, JsonRejection>,
) -> Result<Json<RelayResult>> {
    let Json(order) = payload?;
    let receipt = state.relay().relay(&Submission::Order(order)).await?;
    Ok(Json(RelayResult::delivered(receipt)))
}

/// Relay a contact form message to the shop.
///
/// POST /api/send-contact
#[instrument(skip(state, payload))]
pub async fn send_contact(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<RelayResult>> {
    let Json(contact) = payload?;
    let receipt = state.relay().relay(&Submission::Contact(contact)).await?;
    Ok(Json(RelayResult::delivered(receipt)))
}
