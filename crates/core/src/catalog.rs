//! Product catalog.
//!
//! The parlor sells a small fixed menu, so the catalog is an in-memory list
//! built at startup. [`Catalog::default`] returns the standard IceDelights
//! menu.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::types::{Price, ProductId};

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub description: String,
    /// Average review rating out of 5.
    #[serde(with = "rust_decimal::serde::float")]
    pub rating: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl Product {
    /// A cart line for one unit of this product.
    #[must_use]
    pub fn to_line_item(&self) -> LineItem {
        LineItem::new(
            self.id.clone(),
            self.name.clone(),
            self.price,
            self.category.clone(),
        )
        .with_image(self.image.clone())
        .with_description(self.description.clone())
    }
}

/// An ordered collection of products.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in menu order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Products in one category (exact, case-sensitive match).
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| product.category == category)
    }

    /// Distinct categories in menu order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let product = |id: &str,
                       name: &str,
                       cents: u32,
                       image: &str,
                       description: &str,
                       rating: i64,
                       category: &str,
                       color: &str,
                       size: &str| Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::from_cents(cents),
            image: format!("/assets/products/{image}.png"),
            description: description.to_owned(),
            rating: Decimal::new(rating, 1),
            category: category.to_owned(),
            color: Some(color.to_owned()),
            size: Some(size.to_owned()),
        };

        Self::new(vec![
            product(
                "1",
                "Classic Vanilla Ice Cream",
                499,
                "vanilla-cone",
                "Creamy vanilla ice cream topped with cherry.",
                49,
                "Classic Flavors",
                "White",
                "L",
            ),
            product(
                "2",
                "Chocolate Brownie Sundae",
                549,
                "chocolate-brownie",
                "Rich chocolate ice cream with chunks of brownie.",
                49,
                "Sundaes",
                "Brown",
                "M",
            ),
            product(
                "3",
                "Strawberry Shortcake",
                529,
                "strawberry-shortcake",
                "Strawberry ice cream layered with shortcake.",
                49,
                "Ice Cream Cakes",
                "Red",
                "M",
            ),
            product(
                "4",
                "Mint Chocolate Chip Cone",
                399,
                "mint-chocolate",
                "Refreshing mint ice cream with chocolate chips.",
                48,
                "Classic Flavors",
                "Green",
                "L",
            ),
            product(
                "5",
                "Strawberry Sundae",
                479,
                "strawberry-sundae",
                "Fresh strawberry ice cream with whipped cream.",
                49,
                "Sundaes",
                "Pink",
                "M",
            ),
            product(
                "6",
                "Caramel Swirl Delight",
                519,
                "caramel-swirl",
                "Vanilla ice cream swirled with rich caramel.",
                47,
                "Classic Flavors",
                "Caramel",
                "M",
            ),
            product(
                "7",
                "Blueberry Blast",
                489,
                "blueberry-blast",
                "Blueberry ice cream in a crispy waffle bowl.",
                48,
                "Frozen Yogurt",
                "Purple",
                "L",
            ),
            product(
                "8",
                "Cookies & Cream Shake",
                599,
                "cookies-cream",
                "Classic cookies and cream milkshake.",
                49,
                "Milkshakes",
                "White",
                "L",
            ),
            product(
                "9",
                "Mango Sorbet",
                449,
                "mango-sorbet",
                "Refreshing mango sorbet with fresh mango slices.",
                48,
                "Frozen Yogurt",
                "Orange",
                "S",
            ),
        ])
    }
}
