//! Session-stored data.
//!
//! The cart is stored under [`keys::CART`] as a
//! [`CartState`](icedelights_core::CartState) and rebuilt with the
//! configured shipping policy on each request.

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart line items.
    pub const CART: &str = "cart";
}
