//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Each handler loads it, applies
//! one operation, saves it back, and returns the full cart view so the
//! client never has to recompute totals.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use icedelights_core::{CartState, CartStore, CategoryGroup, Price, ProductId, ShippingPolicy};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart as returned by every cart endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items_by_category: Vec<CategoryGroup>,
    pub item_count: u64,
    pub subtotal: Price,
    pub shipping: Price,
    pub grand_total: Price,
    pub free_shipping_threshold: Price,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        let aggregate = cart.order_aggregate();
        Self {
            items_by_category: aggregate.items_by_category,
            item_count: cart.item_count(),
            subtotal: aggregate.subtotal,
            shipping: aggregate.shipping,
            grand_total: aggregate.grand_total,
            free_shipping_threshold: cart.policy().free_shipping_threshold,
        }
    }
}

/// Cart count badge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session cart, or an empty one.
pub(crate) async fn load_cart(session: &Session, policy: ShippingPolicy) -> Result<CartStore> {
    let state = session
        .get::<CartState>(session_keys::CART)
        .await?
        .unwrap_or_default();
    Ok(CartStore::from_state(state, policy))
}

/// Store the cart back into the session.
pub(crate) async fn save_cart(session: &Session, cart: &CartStore) -> Result<()> {
    session.insert(session_keys::CART, cart.state()).await?;
    Ok(())
}

// =============================================================================
// Request Bodies
// =============================================================================

/// `POST /cart/add` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// `POST /cart/update` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    /// New quantity; zero or less removes the item.
    pub quantity: i64,
}

/// `POST /cart/remove` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session, state.shipping_policy()).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a catalog product to the cart.
#[instrument(skip(state, session, payload))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;

    let product = state
        .catalog()
        .get(&request.product_id)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {}", request.product_id)))?;

    let mut cart = load_cart(&session, state.shipping_policy()).await?;
    cart.add_item_with_quantity(product.to_line_item(), request.quantity.unwrap_or(1));
    save_cart(&session, &cart).await?;

    tracing::debug!(product_id = %request.product_id, items = cart.item_count(), "Added to cart");
    Ok(Json(CartView::from(&cart)))
}

/// Set an item's quantity.
#[instrument(skip(state, session, payload))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<UpdateCartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;

    let mut cart = load_cart(&session, state.shipping_policy()).await?;
    cart.update_quantity(&request.product_id, request.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove an item.
#[instrument(skip(state, session, payload))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<RemoveFromCartRequest>, JsonRejection>,
) -> Result<Json<CartView>> {
    let Json(request) = payload?;

    let mut cart = load_cart(&session, state.shipping_policy()).await?;
    cart.remove_item(&request.product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session, state.shipping_policy()).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Total units in the cart, for the header badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session, state.shipping_policy()).await?;
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}
