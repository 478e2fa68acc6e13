/// Represents one purchase attempt and its outcome.
///
/// # Order Log
/// Every attempt produces exactly one Order, built with its final
/// [`OrderStatus`] and appended to the [`OrderLog`](crate::order_log) once.
/// The log never edits a recorded Order.
use crate::model::ProductId;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Hands out unique [`OrderId`]s to concurrent callers.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    next: AtomicU64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> OrderId {
        OrderId(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Type-safe identifier for the user placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub String);

impl UserId {
    /// The identifier given to the simulated customer with index `n`.
    pub fn customer(n: u32) -> Self {
        Self(format!("user_{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    FailedInsufficientInventory,
    FailedOverselling,
}

impl OrderStatus {
    pub fn is_failed(self) -> bool {
        matches!(
            self,
            OrderStatus::FailedInsufficientInventory | OrderStatus::FailedOverselling
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::FailedInsufficientInventory => "failed_insufficient_inventory",
            OrderStatus::FailedOverselling => "failed_overselling",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Creates a new Order stamped with the current time.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for this attempt
    /// * `user_id` - ID of the user placing the order
    /// * `product_id` - ID of the product being ordered
    /// * `quantity` - Units requested (at least 1)
    /// * `status` - Final outcome of the attempt
    pub fn new(
        id: OrderId,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
        status: OrderStatus,
    ) -> Self {
        Self {
            id,
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
            status,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatus::Confirmed
    }
}
