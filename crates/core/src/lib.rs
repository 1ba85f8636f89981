//! IceDelights Core - cart, catalog, and order message logic.
//!
//! This crate provides the storefront's domain logic:
//! - [`cart`] - Session cart state, category grouping, and totals
//! - [`catalog`] - The product menu
//! - [`order`] - Contact/order payloads and their validated forms
//! - [`validation`] - Field checks that collect every failure
//! - [`sanitize`] - Free-text cleanup for outbound messages
//! - [`message`] - WhatsApp notification text
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The `storefront` binary owns sessions and the WhatsApp transport.
//!
//! # Flow
//!
//! ```
//! use icedelights_core::{
//!     CartStore, LineItem, OrderForm, OrderSubmission, Price, ShippingPolicy, Submission,
//! };
//!
//! let mut cart = CartStore::new(ShippingPolicy::default());
//! cart.add_item(LineItem::new("1", "Vanilla", Price::from_cents(499), "Classic"));
//!
//! let form = OrderForm {
//!     first_name: "Jane".into(),
//!     last_name: "Doe".into(),
//!     email: "jane@example.com".into(),
//!     phone: "555-0100".into(),
//!     ..OrderForm::default()
//! };
//! let submission = Submission::from(OrderSubmission::from_cart(form, &cart.order_aggregate()));
//! let text = submission.validate().unwrap().render();
//! assert!(text.contains("💰 *GRAND TOTAL: $9.99*"));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod message;
pub mod order;
pub mod sanitize;
pub mod types;
pub mod validation;

pub use cart::{
    CartState, CartStore, CategoryGroup, CategoryGroups, LineItem, OrderAggregate, ShippingPolicy,
};
pub use catalog::{Catalog, Product};
pub use order::{
    ContactForm, ContactMessage, ContactSubmission, OrderForm, OrderNotice, OrderSubmission,
    OrderSummary, Submission, ValidSubmission,
};
pub use types::*;
pub use validation::{FieldError, ValidationError};
