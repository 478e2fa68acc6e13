//! Aggregation over recorded orders.

use crate::model::{Order, OrderStatus, ProductId};
use std::collections::BTreeMap;

/// Per-product share of an [`OrderSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductTally {
    pub orders: u64,
    pub confirmed_orders: u64,
    pub confirmed_quantity: u64,
    pub failed_insufficient: u64,
    pub failed_overselling: u64,
}

impl ProductTally {
    /// What was added to the log between `earlier` and `self`.
    pub fn since(&self, earlier: &ProductTally) -> ProductTally {
        ProductTally {
            orders: self.orders.saturating_sub(earlier.orders),
            confirmed_orders: self.confirmed_orders.saturating_sub(earlier.confirmed_orders),
            confirmed_quantity: self.confirmed_quantity.saturating_sub(earlier.confirmed_quantity),
            failed_insufficient: self.failed_insufficient.saturating_sub(earlier.failed_insufficient),
            failed_overselling: self.failed_overselling.saturating_sub(earlier.failed_overselling),
        }
    }
}

/// Counts over every order in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSummary {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub failed_insufficient: u64,
    pub failed_overselling: u64,
    /// Units across all confirmed orders.
    pub confirmed_quantity: u64,
    pub per_product: BTreeMap<ProductId, ProductTally>,
}

impl OrderSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut summary = Self::default();

        for order in orders {
            summary.total += 1;
            let tally = summary.per_product.entry(order.product_id.clone()).or_default();
            tally.orders += 1;

            match order.status {
                OrderStatus::Pending => summary.pending += 1,
                OrderStatus::Confirmed => {
                    summary.confirmed += 1;
                    summary.confirmed_quantity += u64::from(order.quantity);
                    tally.confirmed_orders += 1;
                    tally.confirmed_quantity += u64::from(order.quantity);
                }
                OrderStatus::FailedInsufficientInventory => {
                    summary.failed_insufficient += 1;
                    tally.failed_insufficient += 1;
                }
                OrderStatus::FailedOverselling => {
                    summary.failed_overselling += 1;
                    tally.failed_overselling += 1;
                }
            }
        }

        summary
    }

    pub fn failed(&self) -> u64 {
        self.failed_insufficient + self.failed_overselling
    }

    pub fn for_product(&self, product_id: &ProductId) -> ProductTally {
        self.per_product.get(product_id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, UserId};

    fn order(n: u64, product: &str, quantity: u32, status: OrderStatus) -> Order {
        Order::new(
            OrderId(n),
            UserId::customer(n as u32),
            ProductId::from(product),
            quantity,
            status,
        )
    }

    #[test]
    fn test_empty_log_summarizes_to_zero() {
        let summary = OrderSummary::from_orders(&[]);
        assert_eq!(summary, OrderSummary::default());
        assert_eq!(summary.for_product(&ProductId::from("laptop_001")), ProductTally::default());
    }

    #[test]
    fn test_summary_counts_each_status() {
        let orders = vec![
            order(1, "laptop_001", 2, OrderStatus::Confirmed),
            order(2, "laptop_001", 1, OrderStatus::Confirmed),
            order(3, "laptop_001", 1, OrderStatus::FailedInsufficientInventory),
            order(4, "laptop_001", 2, OrderStatus::FailedOverselling),
            order(5, "phone_002", 1, OrderStatus::Confirmed),
            order(6, "phone_002", 1, OrderStatus::Pending),
        ];

        let summary = OrderSummary::from_orders(&orders);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.confirmed, 3);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.failed_insufficient, 1);
        assert_eq!(summary.failed_overselling, 1);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.confirmed_quantity, 4);

        let laptop = summary.for_product(&ProductId::from("laptop_001"));
        assert_eq!(laptop.orders, 4);
        assert_eq!(laptop.confirmed_orders, 2);
        assert_eq!(laptop.confirmed_quantity, 3);
        assert_eq!(laptop.failed_insufficient, 1);
        assert_eq!(laptop.failed_overselling, 1);
    }

    #[test]
    fn test_tally_since_subtracts_earlier_counts() {
        let earlier = OrderSummary::from_orders(&[order(1, "tablet_003", 1, OrderStatus::Confirmed)]);
        let later = OrderSummary::from_orders(&[
            order(1, "tablet_003", 1, OrderStatus::Confirmed),
            order(2, "tablet_003", 2, OrderStatus::Confirmed),
            order(3, "tablet_003", 1, OrderStatus::FailedInsufficientInventory),
        ]);

        let tablet = ProductId::from("tablet_003");
        let delta = later.for_product(&tablet).since(&earlier.for_product(&tablet));
        assert_eq!(delta.orders, 2);
        assert_eq!(delta.confirmed_orders, 1);
        assert_eq!(delta.confirmed_quantity, 2);
        assert_eq!(delta.failed_insufficient, 1);
    }
}
