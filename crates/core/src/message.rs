//! Notification text for the shop's WhatsApp inbox.
//!
//! Both formatters are pure: the same validated input always produces the
//! same text. Monetary values always carry two decimal places.

use crate::order::{Address, ContactMessage, Customer, OrderNotice};

/// Divider line between message sections.
pub const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━";

fn customer_lines(text: &mut String, customer: &Customer) {
    text.push_str(&format!(
        "👤 Name: {} {}\n",
        customer.first_name, customer.last_name
    ));
    text.push_str(&format!("📧 Email: {}\n", customer.email));
    text.push_str(&format!("📞 Phone: {}\n", customer.phone));
}

fn address_line(address: &Address) -> String {
    let line = format!(
        "{}, {} {}",
        address.city.as_deref().unwrap_or_default(),
        address.state.as_deref().unwrap_or_default(),
        address.zip_code.as_deref().unwrap_or_default(),
    );
    line.trim_end().to_owned()
}

/// Format a new-order notification.
#[must_use]
pub fn format_order_message(order: &OrderNotice) -> String {
    let mut text = String::from("🍦 *NEW ORDER RECEIVED*\n\n");

    text.push_str("*Customer Details:*\n");
    customer_lines(&mut text, &order.customer);
    if let Some(address) = &order.address {
        text.push_str(&format!("📍 Address: {}\n", address_line(address)));
    }
    if let Some(notes) = &order.notes {
        text.push_str(&format!("📝 Notes: {notes}\n"));
    }

    text.push_str("\n*Order Items:*\n");
    text.push_str(DIVIDER);
    text.push('\n');

    for group in &order.categories {
        text.push_str(&format!("\n📁 *{}*\n", group.category));
        for item in &group.items {
            text.push_str(&format!(
                "  • {}x {} - {}\n",
                item.quantity,
                item.name,
                item.line_total
            ));
        }
        text.push_str(&format!("  _Subtotal: {}_\n", group.subtotal));
    }

    text.push('\n');
    text.push_str(DIVIDER);
    text.push('\n');
    text.push_str(&format!("📦 Subtotal: {}\n", order.subtotal));
    text.push_str(&format!("🚚 Shipping: {}\n", order.shipping));
    text.push_str(&format!("💰 *GRAND TOTAL: {}*\n", order.grand_total));
    text
}

/// Format a contact-form notification.
#[must_use]
pub fn format_contact_message(contact: &ContactMessage) -> String {
    let mut text = String::from("📩 *NEW CONTACT MESSAGE*\n\n");
    text.push_str("*From:*\n");
    customer_lines(&mut text, &contact.customer);
    text.push_str("\n*Message:*\n");
    text.push_str(&contact.message);
    text.push('\n');
    text
}
