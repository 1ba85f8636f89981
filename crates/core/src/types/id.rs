//! Newtype IDs for type-safe entity references.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Product identifier (the catalog SKU).
///
/// Product IDs are opaque strings assigned by the catalog (e.g. `"1"`,
/// `"mango-sorbet"`). Wrapping them keeps cart lookups from accepting
/// arbitrary strings such as category names.
///
/// ```
/// use icedelights_core::ProductId;
///
/// let id = ProductId::new("1");
/// assert_eq!(id.as_str(), "1");
/// assert_eq!(id, ProductId::from("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
