//! Shopping cart state and derived totals.
//!
//! [`CartState`] is the serializable list of line items (what a session
//! stores). [`CartStore`] pairs that state with the shop's
//! [`ShippingPolicy`] and exposes the cart operations and the derived views
//! used by the cart page and checkout.
//!
//! # Invariants
//!
//! - No two line items share a product ID.
//! - Every line item has `quantity >= 1`; decrementing to zero removes it.
//! - Items keep the order in which they were first added.

use core::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product SKU.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price of a single unit.
    #[serde(rename = "price")]
    pub unit_price: Price,
    /// Number of units, always at least 1 while the item is in a cart.
    pub quantity: u32,
    /// Product category used for grouping.
    pub category: String,
    /// Image path or URL.
    #[serde(default)]
    pub image: String,
    /// Short product description.
    #[serde(default)]
    pub description: String,
}

impl LineItem {
    /// Create a line item with a quantity of 1.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
            category: category.into(),
            image: String::new(),
            description: String::new(),
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Free-shipping rule applied to the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPolicy {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Price,
    /// Fee charged below the threshold.
    pub flat_shipping_fee: Price,
}

impl ShippingPolicy {
    /// Create a shipping policy.
    #[must_use]
    pub const fn new(free_shipping_threshold: Price, flat_shipping_fee: Price) -> Self {
        Self {
            free_shipping_threshold,
            flat_shipping_fee,
        }
    }

    /// Shipping charged for the given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_shipping_fee
        }
    }
}

impl Default for ShippingPolicy {
    /// Free shipping from $50.00, otherwise a $5.00 flat fee.
    fn default() -> Self {
        Self::new(Price::from_cents(5000), Price::from_cents(500))
    }
}

/// Items sharing a category, with their subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    /// Category name.
    pub category: String,
    /// Items in this category, in cart order.
    pub items: Vec<LineItem>,
    /// Sum of the items' line totals.
    pub subtotal: Price,
}

impl CategoryGroup {
    fn new(category: String, items: Vec<LineItem>) -> Self {
        let subtotal = items.iter().map(LineItem::line_total).sum();
        Self {
            category,
            items,
            subtotal,
        }
    }
}

/// Snapshot of the cart's grouped items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAggregate {
    /// Items grouped by category in first-seen order.
    pub items_by_category: Vec<CategoryGroup>,
    /// Sum of all category subtotals.
    pub subtotal: Price,
    /// Shipping charged under the store's policy.
    pub shipping: Price,
    /// Subtotal plus shipping.
    pub grand_total: Price,
}

/// Ordered line items held for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

/// The cart: line items plus the shipping policy used for totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    state: CartState,
    policy: ShippingPolicy,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new(policy: ShippingPolicy) -> Self {
        Self::from_state(CartState::default(), policy)
    }

    /// Rebuild a cart from previously stored state.
    ///
    /// Entries that break the cart invariants (zero quantity, a repeated ID)
    /// are dropped, so state from an untrusted store can never yield an
    /// invalid cart.
    #[must_use]
    pub fn from_state(state: CartState, policy: ShippingPolicy) -> Self {
        let mut items: Vec<LineItem> = Vec::with_capacity(state.items.len());
        for item in state.items {
            if item.quantity > 0 && !items.iter().any(|existing| existing.id == item.id) {
                items.push(item);
            }
        }
        Self {
            state: CartState { items },
            policy,
        }
    }

    /// Borrow the stored state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Consume the cart, returning its state for storage.
    #[must_use]
    pub fn into_state(self) -> CartState {
        self.state
    }

    /// The shipping policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    /// Add one unit of an item.
    ///
    /// If the product is already in the cart its quantity goes up by one;
    /// otherwise the item is appended with a quantity of one.
    pub fn add_item(&mut self, item: LineItem) {
        self.add_item_with_quantity(item, 1);
    }

    /// Add `delta` units of an item (a zero delta counts as one).
    pub fn add_item_with_quantity(&mut self, mut item: LineItem, delta: u32) {
        let delta = delta.max(1);
        match self.state.position(&item.id) {
            Some(index) => {
                if let Some(existing) = self.state.items.get_mut(index) {
                    existing.quantity = existing.quantity.saturating_add(delta);
                }
            }
            None => {
                item.quantity = delta;
                self.state.items.push(item);
            }
        }
    }

    /// Set an item's quantity, removing it when `quantity <= 0`.
    ///
    /// Does nothing if the product is not in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if let Some(item) = self.state.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX).max(1);
        }
    }

    /// Remove an item if present.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.state.items.retain(|item| &item.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.state.items.clear();
    }

    /// Look up a line item.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.state.items.iter().find(|item| &item.id == id)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Returns `true` if the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Group items by category, in the order categories were first added.
    ///
    /// The returned iterator computes each group when it is reached and can
    /// be cloned to start over. It borrows the cart, so it always reflects
    /// the current contents.
    #[must_use]
    pub fn items_by_category(&self) -> CategoryGroups<'_> {
        CategoryGroups {
            items: self.items(),
            cursor: 0,
        }
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.items.iter().map(LineItem::line_total).sum()
    }

    /// Shipping charged on the current subtotal.
    #[must_use]
    pub fn shipping(&self) -> Price {
        self.policy.shipping_for(self.subtotal())
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.subtotal() + self.shipping()
    }

    /// Snapshot groups and totals for checkout.
    #[must_use]
    pub fn order_aggregate(&self) -> OrderAggregate {
        let subtotal = self.subtotal();
        let shipping = self.policy.shipping_for(subtotal);
        OrderAggregate {
            items_by_category: self.items_by_category().collect(),
            subtotal,
            shipping,
            grand_total: subtotal + shipping,
        }
    }
}

/// Iterator over a cart's [`CategoryGroup`]s.
///
/// Created by [`CartStore::items_by_category`].
#[derive(Debug, Clone)]
pub struct CategoryGroups<'a> {
    items: &'a [LineItem],
    cursor: usize,
}

impl Iterator for CategoryGroups<'_> {
    type Item = CategoryGroup;

    fn next(&mut self) -> Option<Self::Item> {
        let items = self.items;
        while let Some(item) = items.get(self.cursor) {
            let index = self.cursor;
            self.cursor += 1;

            // Only the first item of a category opens a group.
            if items
                .iter()
                .take(index)
                .any(|earlier| earlier.category == item.category)
            {
                continue;
            }

            let members = items
                .iter()
                .skip(index)
                .filter(|other| other.category == item.category)
                .cloned()
                .collect();
            return Some(CategoryGroup::new(item.category.clone(), members));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.cursor);
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for CategoryGroups<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: &str, name: &str, cents: u32, category: &str) -> LineItem {
        LineItem::new(id, name, Price::from_cents(cents), category)
    }

    fn cart() -> CartStore {
        CartStore::new(ShippingPolicy::default())
    }

    #[test]
    fn test_add_vanilla_to_empty_cart() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));

        assert_eq!(cart.subtotal(), Price::from_cents(499));
        assert_eq!(cart.shipping(), cart.policy().flat_shipping_fee);
        assert_eq!(
            cart.grand_total(),
            Price::from_cents(499) + cart.policy().flat_shipping_fee
        );
    }

    #[test]
    fn test_add_same_id_twice_merges() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.add_item(item("1", "Vanilla", 499, "Classic"));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_with_quantity() {
        let mut cart = cart();
        cart.add_item_with_quantity(item("1", "Vanilla", 499, "Classic"), 3);
        cart.add_item_with_quantity(item("1", "Vanilla", 499, "Classic"), 2);
        cart.add_item_with_quantity(item("2", "Mango", 449, "Frozen Yogurt"), 0);

        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 5);
        assert_eq!(cart.get(&ProductId::new("2")).unwrap().quantity, 1);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.update_quantity(&ProductId::new("1"), 0);

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.update_quantity(&ProductId::new("1"), -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.update_quantity(&ProductId::new("1"), 4);
        assert_eq!(cart.subtotal(), Price::from_cents(1996));
    }

    #[test]
    fn test_update_quantity_missing_is_noop() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.update_quantity(&ProductId::new("9"), 3);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_quantity_saturates() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.update_quantity(&ProductId::new("1"), i64::MAX);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.add_item(item("2", "Sundae", 549, "Sundaes"));
        cart.remove_item(&ProductId::new("1"));
        cart.remove_item(&ProductId::new("1"));
        assert_eq!(cart.len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_items_by_category_first_seen_order() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic Flavors"));
        cart.add_item(item("2", "Brownie Sundae", 549, "Sundaes"));
        cart.add_item(item("4", "Mint Chip", 399, "Classic Flavors"));
        cart.update_quantity(&ProductId::new("4"), 2);

        let groups: Vec<CategoryGroup> = cart.items_by_category().collect();
        assert_eq!(groups.len(), 2);

        let classic = groups.first().unwrap();
        assert_eq!(classic.category, "Classic Flavors");
        assert_eq!(classic.items.len(), 2);
        assert_eq!(classic.subtotal, Price::from_cents(499 + 2 * 399));

        let sundaes = groups.get(1).unwrap();
        assert_eq!(sundaes.category, "Sundaes");
        assert_eq!(sundaes.subtotal, Price::from_cents(549));
    }

    #[test]
    fn test_items_by_category_restartable() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.add_item(item("2", "Sundae", 549, "Sundaes"));

        let groups = cart.items_by_category();
        let first: Vec<_> = groups.clone().collect();
        let second: Vec<_> = groups.collect();
        assert_eq!(first, second);
        assert_eq!(first, cart.items_by_category().collect::<Vec<_>>());
    }

    #[test]
    fn test_items_by_category_empty() {
        assert_eq!(cart().items_by_category().count(), 0);
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let mut cart = cart();
        cart.add_item_with_quantity(item("8", "Shake", 1000, "Milkshakes"), 5);

        assert_eq!(cart.subtotal(), Price::from_cents(5000));
        assert_eq!(cart.shipping(), Price::ZERO);
        assert_eq!(cart.grand_total(), Price::from_cents(5000));
    }

    #[test]
    fn test_order_aggregate() {
        let mut cart = cart();
        cart.add_item(item("1", "Vanilla", 499, "Classic"));
        cart.add_item(item("2", "Sundae", 549, "Sundaes"));

        let aggregate = cart.order_aggregate();
        assert_eq!(aggregate.items_by_category.len(), 2);
        assert_eq!(aggregate.subtotal, Price::from_cents(1048));
        assert_eq!(aggregate.shipping, Price::from_cents(500));
        assert_eq!(aggregate.grand_total, Price::from_cents(1548));
    }

    #[test]
    fn test_from_state_drops_invalid_entries() {
        let json = r#"[
            {"id":"1","name":"Vanilla","price":4.99,"quantity":0,"category":"Classic"},
            {"id":"2","name":"Sundae","price":5.49,"quantity":2,"category":"Sundaes"},
            {"id":"2","name":"Sundae","price":5.49,"quantity":7,"category":"Sundaes"}
        ]"#;
        let state: CartState = serde_json::from_str(json).unwrap();
        let cart = CartStore::from_state(state, ShippingPolicy::default());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_state_roundtrip_keeps_order() {
        let mut cart = cart();
        cart.add_item(item("3", "Shortcake", 529, "Cakes"));
        cart.add_item(item("1", "Vanilla", 499, "Classic"));

        let json = serde_json::to_string(cart.state()).unwrap();
        let state: CartState = serde_json::from_str(&json).unwrap();
        let restored = CartStore::from_state(state, ShippingPolicy::default());

        assert_eq!(restored, cart);
        assert_eq!(restored.items().first().unwrap().id, ProductId::new("3"));
    }

    #[test]
    fn test_line_total_decimal() {
        let line = LineItem::new(
            "1",
            "Vanilla",
            Price::new(Decimal::new(499, 2)).unwrap(),
            "Classic",
        );
        assert_eq!(line.line_total().to_string(), "$4.99");
    }
}
