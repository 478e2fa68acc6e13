//! A single simulated customer: arrive, reserve, record.

use super::CustomerError;
use crate::ledger::{InventoryLedger, LedgerError, Reservation, ReservationMode};
use crate::model::{Order, OrderIdGenerator, OrderStatus, ProductId, UserId};
use crate::order_log::OrderLogClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// What every customer in one sale shares.
#[derive(Clone)]
pub struct Storefront {
    pub ledger: Arc<InventoryLedger>,
    pub order_log: OrderLogClient,
    pub order_ids: Arc<OrderIdGenerator>,
    pub product_id: ProductId,
    pub mode: ReservationMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub index: u32,
    pub user_id: UserId,
    pub quantity: u32,
    /// Delay before the customer reaches the store.
    pub arrival: Duration,
}

/// A purchase attempt that reached the order log.
#[derive(Debug, Clone, PartialEq)]
pub enum Purchase {
    /// Confirmed, or turned away for lack of stock.
    Completed(Order),
    /// The reservation oversold the product; the order was recorded as
    /// `failed_overselling`.
    Oversold { order: Order, signal: LedgerError },
}

impl Purchase {
    pub fn order(&self) -> &Order {
        match self {
            Purchase::Completed(order) | Purchase::Oversold { order, .. } => order,
        }
    }
}

impl Customer {
    pub fn new(index: u32, quantity: u32, arrival: Duration) -> Self {
        Self {
            index,
            user_id: UserId::customer(index),
            quantity,
            arrival,
        }
    }

    /// Reserves stock and records exactly one order for the attempt.
    ///
    /// # Errors
    /// A malformed reservation is returned without recording anything; a closed order
    /// log is returned after the reservation has already been applied.
    #[instrument(name = "customer", skip_all, fields(user_id = %self.user_id, quantity = self.quantity))]
    pub async fn purchase(&self, store: &Storefront) -> Result<Purchase, CustomerError> {
        if !self.arrival.is_zero() {
            tokio::time::sleep(self.arrival).await;
        }

        let order_id = store.order_ids.next_id();
        let reserved = store
            .ledger
            .reserve(&store.product_id, self.quantity, store.mode)
            .await;

        let (status, signal) = match reserved {
            Ok(Reservation::Confirmed { .. }) => (OrderStatus::Confirmed, None),
            Ok(Reservation::Rejected { .. }) => (OrderStatus::FailedInsufficientInventory, None),
            Err(signal @ LedgerError::OversellingDetected { .. }) => {
                (OrderStatus::FailedOverselling, Some(signal))
            }
            Err(e) => return Err(e.into()),
        };

        let order = Order::new(
            order_id,
            self.user_id.clone(),
            store.product_id.clone(),
            self.quantity,
            status,
        );
        store.order_log.record(order.clone()).await?;
        debug!(order_id = %order.id, %status, "Purchase recorded");

        Ok(match signal {
            Some(signal) => Purchase::Oversold { order, signal },
            None => Purchase::Completed(order),
        })
    }
}
