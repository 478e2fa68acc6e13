use crate::ledger::InventoryLedger;
use crate::model::OrderIdGenerator;
use crate::order_log::{self, OrderLogClient};
use std::sync::Arc;
use tracing::{error, info};

/// Channel capacity of the order log; customers wait for space when it is full.
const ORDER_LOG_BUFFER: usize = 64;

/// Everything one flash sale runs against.
///
/// `SaleSystem` owns:
/// - **The ledger**: shared with every customer task through an `Arc`
/// - **The order log**: its actor task and the client customers record through
/// - **The order id generator**: shared by every customer of every sale
///
/// A fresh system per sale keeps runs independent: each one starts from the seed
/// stock and an empty log.
///
/// # Example
///
/// ```rust
/// use flash_sale::lifecycle::SaleSystem;
/// use flash_sale::ledger::InventoryLedger;
/// use flash_sale::model::flash_sale_catalog;
///
/// #[tokio::main]
/// async fn main() -> Result<(), String> {
///     let system = SaleSystem::new(InventoryLedger::new(flash_sale_catalog()));
///     // ... run a sale against system.ledger / system.order_log ...
///     system.shutdown().await
/// }
/// ```
pub struct SaleSystem {
    /// The inventory every customer reserves against
    pub ledger: Arc<InventoryLedger>,

    /// Client for the order log actor
    pub order_log: OrderLogClient,

    /// Order ids stay unique across every sale run on this system
    pub order_ids: Arc<OrderIdGenerator>,

    /// Task handle of the order log actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl SaleSystem {
    /// Spawns the order log actor and wraps `ledger` for sharing.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(ledger: InventoryLedger) -> Self {
        let (log_actor, order_log) = order_log::new(ORDER_LOG_BUFFER);
        let handle = tokio::spawn(log_actor.run());

        Self {
            ledger: Arc::new(ledger),
            order_log,
            order_ids: Arc::new(OrderIdGenerator::new()),
            handle,
        }
    }

    /// Gracefully shuts down the order log.
    ///
    /// Dropping the last client closes the channel; the actor drains what is queued
    /// and exits. Clones still held elsewhere (for example by a customer task that has
    /// not finished) keep the actor alive until they are dropped too.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor shut down cleanly
    /// - `Err(String)` if the actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down sale system...");

        drop(self.order_log);

        if let Err(e) = self.handle.await {
            error!("Order log task failed: {:?}", e);
            return Err(format!("Order log task failed: {:?}", e));
        }

        info!("Sale system shutdown complete.");
        Ok(())
    }
}
