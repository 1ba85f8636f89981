//! Contact and order submissions.
//!
//! Two layers of types live here:
//!
//! - **Wire payloads** ([`ContactSubmission`], [`OrderSubmission`]) mirror the
//!   JSON the browser storefront posts. Every field is optional at parse time
//!   so that validation can report all problems at once instead of failing on
//!   the first missing key.
//! - **Validated messages** ([`ContactMessage`], [`OrderNotice`]) are produced
//!   by [`crate::validation`] and hold sanitized text and non-negative
//!   [`Price`]s. Only these can be formatted into outbound messages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::OrderAggregate;
use crate::types::{Email, Price};
use crate::validation::{self, ValidationError};

// =============================================================================
// Wire Payloads
// =============================================================================

/// Contact form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Checkout form fields: contact details plus an optional delivery address
/// and order notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub category: String,
}

/// A category section of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCategory {
    pub category: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// Submitted order totals, as computed by the client's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(default)]
    pub items_by_category: Vec<OrderCategory>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub grand_total: Option<Decimal>,
}

impl From<&OrderAggregate> for OrderSummary {
    fn from(aggregate: &OrderAggregate) -> Self {
        Self {
            items_by_category: aggregate
                .items_by_category
                .iter()
                .map(|group| OrderCategory {
                    category: group.category.clone(),
                    items: group
                        .items
                        .iter()
                        .map(|item| OrderItem {
                            name: item.name.clone(),
                            price: item.unit_price.amount(),
                            quantity: item.quantity,
                            category: item.category.clone(),
                        })
                        .collect(),
                    subtotal: group.subtotal.amount(),
                })
                .collect(),
            subtotal: aggregate.subtotal.amount(),
            shipping: aggregate.shipping.amount(),
            grand_total: Some(aggregate.grand_total.amount()),
        }
    }
}

/// `POST /api/send-contact` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(rename = "formData", default)]
    pub form: ContactForm,
}

/// `POST /api/send-order` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    #[serde(rename = "formData", default)]
    pub form: OrderForm,
    #[serde(rename = "orderData", default)]
    pub order: Option<OrderSummary>,
}

impl OrderSubmission {
    /// Package a checkout form with a cart snapshot.
    #[must_use]
    pub fn from_cart(form: OrderForm, aggregate: &OrderAggregate) -> Self {
        Self {
            form,
            order: Some(OrderSummary::from(aggregate)),
        }
    }
}

/// A submission of either kind, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Submission {
    Contact(ContactSubmission),
    Order(OrderSubmission),
}

impl Submission {
    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Contact(_) => "contact",
            Self::Order(_) => "order",
        }
    }

    /// Check every field and produce sanitized message content.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every field that failed.
    pub fn validate(&self) -> Result<ValidSubmission, ValidationError> {
        match self {
            Self::Contact(contact) => {
                validation::validate_contact(contact).map(ValidSubmission::Contact)
            }
            Self::Order(order) => validation::validate_order(order).map(ValidSubmission::Order),
        }
    }
}

impl From<ContactSubmission> for Submission {
    fn from(submission: ContactSubmission) -> Self {
        Self::Contact(submission)
    }
}

impl From<OrderSubmission> for Submission {
    fn from(submission: OrderSubmission) -> Self {
        Self::Order(submission)
    }
}

// =============================================================================
// Validated Messages
// =============================================================================

/// Sanitized customer identity and contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
}

/// Sanitized delivery address; at least one part is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// A validated contact form message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub customer: Customer,
    pub message: String,
}

/// A line of a validated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    /// Unit price multiplied by quantity, computed without overflow during
    /// validation.
    pub line_total: Price,
}

/// A category section of a validated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeCategory {
    pub category: String,
    pub items: Vec<NoticeItem>,
    pub subtotal: Price,
}

/// A validated order ready to be formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNotice {
    pub customer: Customer,
    pub address: Option<Address>,
    pub notes: Option<String>,
    pub categories: Vec<NoticeCategory>,
    pub subtotal: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

/// Output of [`Submission::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidSubmission {
    Contact(ContactMessage),
    Order(OrderNotice),
}

impl ValidSubmission {
    /// Format the outbound notification text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Contact(contact) => crate::message::format_contact_message(contact),
            Self::Order(order) => crate::message::format_order_message(order),
        }
    }
}
