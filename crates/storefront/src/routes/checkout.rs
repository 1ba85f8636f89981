//! Checkout: turn the session cart into an order and notify the shop.
//!
//! Placing the order and delivering the WhatsApp notification are separate
//! outcomes. Once the form validates, the order is accepted and the cart is
//! cleared even if the notification fails; the response reports both.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use icedelights_core::{OrderForm, OrderSubmission, Submission};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{load_cart, save_cart};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{RelayError, RelayResult};
use crate::state::AppState;

/// `POST /checkout` body.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "formData", default)]
    pub form: OrderForm,
}

/// `POST /checkout` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_placed: bool,
    pub notification: RelayResult,
}

/// Place an order for the session cart.
#[instrument(skip(state, session, payload))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>> {
    let Json(request) = payload?;

    let mut cart = load_cart(&session, state.shipping_policy()).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let submission = Submission::Order(OrderSubmission::from_cart(
        request.form,
        &cart.order_aggregate(),
    ));

    let outcome = state.relay().relay(&submission).await;
    if let Err(RelayError::Validation(err)) = outcome {
        return Err(AppError::Validation(err));
    }

    let grand_total = cart.grand_total().to_string();
    cart.clear();
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("grand_total", grand_total.as_str())]),
    );
    match &outcome {
        Ok(_) => tracing::info!(grand_total = %grand_total, "Order placed"),
        Err(err) => tracing::warn!(
            grand_total = %grand_total,
            error = %err,
            "Order placed but shop notification failed"
        ),
    }

    Ok(Json(CheckoutResponse {
        order_placed: true,
        notification: RelayResult::from(outcome),
    }))
}
