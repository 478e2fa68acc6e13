/// Represents a product offered in the flash sale.
///
/// # Inventory Ledger
/// Products are created once from a [`ProductSeed`] when the
/// [`InventoryLedger`](crate::ledger::InventoryLedger) is built and are never removed
/// during a run. The ledger is the only place their stock changes.
use serde::Deserialize;
use std::fmt::Display;

/// Type-safe identifier for Products (e.g. `laptop_001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point-in-time view of a product held by the ledger.
///
/// `stock` is signed: the unsafe reservation path can drive it below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Unique product identifier
    /// * `name` - Display name
    /// * `price` - Unit price
    /// * `stock` - Units currently available
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
        }
    }
}

/// Seed data for a product, supplied when the ledger is constructed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSeed {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

impl ProductSeed {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
        }
    }
}

/// The catalog used by the canonical flash-sale scenarios.
///
/// Every product carries far less stock than the number of customers that will
/// chase it.
pub fn flash_sale_catalog() -> Vec<ProductSeed> {
    vec![
        ProductSeed::new("laptop_001", "Gaming Laptop", 1299.99, 5),
        ProductSeed::new("phone_002", "Smartphone", 899.99, 3),
        ProductSeed::new("tablet_003", "Tablet", 499.99, 2),
        ProductSeed::new("headphones_004", "Wireless Headphones", 199.99, 10),
    ]
}
