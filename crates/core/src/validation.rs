//! Field validation for contact and order submissions.
//!
//! Validation collects every failing field before returning, so a client
//! can highlight all problems in one round trip. Text length limits are
//! counted in characters after trimming. Passing validation yields the
//! sanitized message types from [`crate::order`].

use core::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::order::{
    Address, ContactMessage, ContactSubmission, Customer, NoticeCategory, NoticeItem,
    OrderNotice, OrderSubmission,
};
use crate::sanitize::{
    EMAIL_MAX_CHARS, MESSAGE_MAX_CHARS, NAME_MAX_CHARS, SHORT_MAX_CHARS, sanitize_optional,
    sanitize_text,
};
use crate::types::{Email, Price};

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the JSON payload (e.g. `firstName`).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

/// One or more submission fields failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Returns `true` if `field` is among the failures.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }

    /// Names of the failed fields, in the order they were checked.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|error| error.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (index, error) in self.fields.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates field errors.
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn required_text(&mut self, field: &str, value: &str, max_chars: usize) {
        let value = value.trim();
        if value.is_empty() {
            self.reject(field, "is required");
        } else if value.chars().count() > max_chars {
            self.reject(field, format!("must be at most {max_chars} characters"));
        }
    }

    fn optional_text(&mut self, field: &str, value: Option<&str>, max_chars: usize) {
        if let Some(value) = value
            && value.trim().chars().count() > max_chars
        {
            self.reject(field, format!("must be at most {max_chars} characters"));
        }
    }

    fn email(&mut self, field: &str, value: &str) -> Option<Email> {
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(err) => {
                self.reject(field, format!("must be a valid email address ({err})"));
                None
            }
        }
    }

    /// Check an amount is non-negative; returns zero when it is not.
    fn amount(&mut self, field: &str, value: Decimal) -> Price {
        Price::new(value).unwrap_or_else(|_| {
            self.reject(field, "must be zero or greater");
            Price::ZERO
        })
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: self.errors,
            })
        }
    }
}

/// Shared identity checks for both forms.
fn check_identity(
    validator: &mut Validator,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
) -> Option<Email> {
    validator.required_text("firstName", first_name, NAME_MAX_CHARS);
    validator.required_text("lastName", last_name, NAME_MAX_CHARS);
    let email = validator.email("email", email);
    validator.required_text("phone", phone, SHORT_MAX_CHARS);
    email
}

fn customer(first_name: &str, last_name: &str, email: Email, phone: &str) -> Customer {
    Customer {
        first_name: sanitize_text(first_name, NAME_MAX_CHARS),
        last_name: sanitize_text(last_name, NAME_MAX_CHARS),
        email: Email::parse(&sanitize_text(email.as_str(), EMAIL_MAX_CHARS)).unwrap_or(email),
        phone: sanitize_text(phone, SHORT_MAX_CHARS),
    }
}

fn invalid_email() -> ValidationError {
    ValidationError {
        fields: vec![FieldError {
            field: "email".to_owned(),
            message: "must be a valid email address".to_owned(),
        }],
    }
}

/// Validate and sanitize a contact form submission.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every invalid field.
pub fn validate_contact(submission: &ContactSubmission) -> Result<ContactMessage, ValidationError> {
    let form = &submission.form;
    let mut validator = Validator::default();

    let email = check_identity(
        &mut validator,
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.phone,
    );
    validator.required_text("message", &form.message, MESSAGE_MAX_CHARS);
    validator.finish()?;

    let email = email.ok_or_else(invalid_email)?;
    Ok(ContactMessage {
        customer: customer(&form.first_name, &form.last_name, email, &form.phone),
        message: sanitize_text(&form.message, MESSAGE_MAX_CHARS),
    })
}

/// Validate and sanitize a checkout submission.
///
/// Address fields and notes are optional. The order totals are taken as
/// submitted; only their signs are checked.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every invalid field.
pub fn validate_order(submission: &OrderSubmission) -> Result<OrderNotice, ValidationError> {
    let form = &submission.form;
    let mut validator = Validator::default();

    let email = check_identity(
        &mut validator,
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.phone,
    );
    validator.optional_text("state", form.state.as_deref(), NAME_MAX_CHARS);
    validator.optional_text("city", form.city.as_deref(), NAME_MAX_CHARS);
    validator.optional_text("zipCode", form.zip_code.as_deref(), SHORT_MAX_CHARS);
    validator.optional_text("message", form.message.as_deref(), MESSAGE_MAX_CHARS);

    let mut categories = Vec::new();
    let mut subtotal = Price::ZERO;
    let mut shipping = Price::ZERO;
    let mut grand_total = Price::ZERO;

    match &submission.order {
        None => validator.reject("orderData", "is required"),
        Some(order) => {
            match order.grand_total {
                Some(total) => grand_total = validator.amount("grandTotal", total),
                None => validator.reject("grandTotal", "is required"),
            }
            subtotal = validator.amount("subtotal", order.subtotal);
            shipping = validator.amount("shipping", order.shipping);

            for (group_index, group) in order.items_by_category.iter().enumerate() {
                let prefix = format!("itemsByCategory[{group_index}]");
                let mut items = Vec::with_capacity(group.items.len());
                for (item_index, item) in group.items.iter().enumerate() {
                    let field = format!("{prefix}.items[{item_index}]");
                    let price_field = format!("{field}.price");
                    let unit_price = validator.amount(&price_field, item.price);
                    if item.quantity == 0 {
                        validator.reject(format!("{field}.quantity"), "must be at least 1");
                    }
                    let line_total = unit_price.checked_times(item.quantity).unwrap_or_else(|| {
                        validator.reject(price_field, "is too large for the quantity ordered");
                        Price::ZERO
                    });
                    items.push(NoticeItem {
                        name: sanitize_text(&item.name, NAME_MAX_CHARS),
                        quantity: item.quantity,
                        unit_price,
                        line_total,
                    });
                }
                categories.push(NoticeCategory {
                    category: sanitize_text(&group.category, NAME_MAX_CHARS),
                    items,
                    subtotal: validator.amount(&format!("{prefix}.subtotal"), group.subtotal),
                });
            }
        }
    }

    validator.finish()?;

    let email = email.ok_or_else(invalid_email)?;
    let city = sanitize_optional(form.city.as_deref(), NAME_MAX_CHARS);
    let state = sanitize_optional(form.state.as_deref(), NAME_MAX_CHARS);
    let zip_code = sanitize_optional(form.zip_code.as_deref(), SHORT_MAX_CHARS);
    let address = (city.is_some() || state.is_some() || zip_code.is_some()).then_some(Address {
        city,
        state,
        zip_code,
    });

    Ok(OrderNotice {
        customer: customer(&form.first_name, &form.last_name, email, &form.phone),
        address,
        notes: sanitize_optional(form.message.as_deref(), MESSAGE_MAX_CHARS),
        categories,
        subtotal,
        shipping,
        grand_total,
    })
}
