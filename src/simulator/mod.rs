//! # Flash-Sale Simulator
//!
//! Drives many concurrent customers at one product and reports what happened to its
//! stock. This is the only consumer of the ledger and the order log, and it uses them
//! exactly through their public operations:
//!
//! 1. `get_stock` for the starting stock, `summarize` for the log's starting tally
//! 2. per customer, in its own task: `reserve`, then `record`
//! 3. `snapshot` and `summarize` once every customer is accounted for
//!
//! ## Discrepancy
//!
//! ```text
//! discrepancy = final_stock - (initial_stock - units_sold)
//! ```
//!
//! `units_sold` only counts confirmed orders. Under [`ReservationMode::Safe`] the
//! discrepancy is always 0. Under [`ReservationMode::Unsafe`] an oversold reservation
//! still takes its units out of stock while its order is recorded as failed, so every
//! overselling event pushes the discrepancy below zero.
//!
//! ## Partial Failure
//!
//! Customers are collected against one deadline. A customer that errors, panics or is
//! still running at the deadline is reported in its [`CustomerReport`] and the rest are
//! still collected.

pub mod customer;
pub mod error;
pub mod scenario;

pub use customer::*;
pub use error::*;

use crate::ledger::timing::{sample_millis, whole_millis};
use crate::ledger::{LedgerError, LedgerSnapshot, ReservationMode};
use crate::lifecycle::SaleSystem;
use crate::model::{Order, ProductId};
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{info, warn};

/// One sale: who is buying what, and how the ledger is asked.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRequest {
    pub product_id: ProductId,
    pub customers: u32,
    pub mode: ReservationMode,
}

impl SaleRequest {
    pub fn new(product_id: impl Into<ProductId>, customers: u32, mode: ReservationMode) -> Self {
        Self {
            product_id: product_id.into(),
            customers,
            mode,
        }
    }
}

/// How customers are generated and collected.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleSettings {
    /// Customers allowed to run at the same time.
    pub max_concurrency: usize,
    /// Deadline for collecting every customer, measured from the last spawn.
    pub collect_timeout: Duration,
    /// Upper bound of each customer's random arrival delay.
    pub arrival_jitter: Duration,
    /// Quantities a customer picks from, uniformly.
    pub quantity_choices: Vec<u32>,
}

impl Default for SaleSettings {
    /// Every customer arrives at once and buys a single unit.
    fn default() -> Self {
        Self {
            max_concurrency: 20,
            collect_timeout: Duration::from_secs(30),
            arrival_jitter: Duration::ZERO,
            quantity_choices: vec![1],
        }
    }
}

impl SaleSettings {
    /// Generates `count` customers with random quantities and arrival delays.
    pub fn plan_customers(&self, count: u32) -> Vec<Customer> {
        let mut rng = rand::rng();
        let jitter_ms = whole_millis(self.arrival_jitter);

        (0..count)
            .map(|index| {
                let quantity = self.quantity_choices.choose(&mut rng).copied().unwrap_or(1);
                let arrival = Duration::from_millis(sample_millis(0, jitter_ms));
                Customer::new(index, quantity, arrival)
            })
            .collect()
    }
}

/// How one customer's attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerOutcome {
    /// Confirmed or turned away for lack of stock.
    Ordered(Order),
    /// Oversold the product; the order was recorded as `failed_overselling`.
    Oversold { order: Order, signal: LedgerError },
    Errored(CustomerError),
    Panicked(String),
    /// Still running at the collection deadline; the task was aborted.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerReport {
    pub customer: u32,
    pub outcome: CustomerOutcome,
}

impl CustomerReport {
    /// True when the customer never produced an order.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            CustomerOutcome::Errored(_) | CustomerOutcome::Panicked(_) | CustomerOutcome::TimedOut
        )
    }
}

/// Everything observed during one sale.
///
/// Stock and order counts are only guaranteed to agree when every customer was
/// collected. A customer aborted at the deadline may already have reserved units
/// without getting its order into the log, so a report with
/// [`timed_out`](SaleReport::timed_out) customers can show a nonzero
/// [`discrepancy`](SaleReport::discrepancy) even in safe mode. Check
/// [`is_complete`](SaleReport::is_complete) before reading it as overselling.
#[derive(Debug, Clone)]
pub struct SaleReport {
    pub product_id: ProductId,
    pub mode: ReservationMode,
    pub customers: u32,
    pub initial_stock: i64,
    pub final_stock: i64,
    /// Units across this sale's confirmed orders.
    pub units_sold: u64,
    pub orders_recorded: u64,
    pub confirmed_orders: u64,
    pub failed_insufficient: u64,
    pub failed_overselling: u64,
    /// `OversellingDetected` signals raised to customers.
    pub overselling_signals: usize,
    pub outcomes: Vec<CustomerReport>,
    pub snapshot: LedgerSnapshot,
}

impl SaleReport {
    pub fn expected_final_stock(&self) -> i64 {
        self.initial_stock - i64::try_from(self.units_sold).unwrap_or(i64::MAX)
    }

    /// `final_stock - (initial_stock - units_sold)`; see the type docs for what a
    /// timed-out customer does to it.
    pub fn discrepancy(&self) -> i64 {
        self.final_stock - self.expected_final_stock()
    }

    /// Stock went negative or a reservation reported overselling.
    pub fn oversold(&self) -> bool {
        self.final_stock < 0 || self.overselling_signals > 0
    }

    pub fn failed_orders(&self) -> u64 {
        self.failed_insufficient + self.failed_overselling
    }

    pub fn customer_failures(&self) -> impl Iterator<Item = &CustomerReport> {
        self.outcomes.iter().filter(|report| report.is_failure())
    }

    /// Every customer was collected, so each reservation made has its order recorded.
    pub fn is_complete(&self) -> bool {
        self.timed_out() == 0
    }

    pub fn timed_out(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|report| report.outcome == CustomerOutcome::TimedOut)
            .count()
    }
}

/// Runs one flash sale against `system` and reports on it.
///
/// # Errors
/// - [`SimulationError::UnknownProduct`] if the ledger does not carry the product.
/// - [`SimulationError::InvalidSettings`] for a zero concurrency bound.
/// - [`SimulationError::OrderLog`] if the log cannot be summarized.
///
/// Individual customer failures are not errors; they are in
/// [`SaleReport::outcomes`].
pub async fn run_flash_sale(
    system: &SaleSystem,
    request: &SaleRequest,
    settings: &SaleSettings,
) -> Result<SaleReport, SimulationError> {
    if !system.ledger.contains(&request.product_id) {
        return Err(SimulationError::UnknownProduct(request.product_id.clone()));
    }
    if settings.max_concurrency == 0 {
        return Err(SimulationError::InvalidSettings(
            "max_concurrency must be at least 1".into(),
        ));
    }

    let initial_stock = system.ledger.get_stock(&request.product_id);
    let tally_before = system.order_log.summarize().await?.for_product(&request.product_id);
    info!(
        product_id = %request.product_id,
        mode = %request.mode,
        customers = request.customers,
        initial_stock,
        "Flash sale started"
    );

    let store = Storefront {
        ledger: system.ledger.clone(),
        order_log: system.order_log.clone(),
        order_ids: system.order_ids.clone(),
        product_id: request.product_id.clone(),
        mode: request.mode,
    };
    let pool = Arc::new(Semaphore::new(settings.max_concurrency));

    let handles: Vec<_> = settings
        .plan_customers(request.customers)
        .into_iter()
        .map(|customer| {
            let store = store.clone();
            let pool = pool.clone();
            let index = customer.index;
            let handle = tokio::spawn(async move {
                let _permit = pool.acquire_owned().await.map_err(|_| CustomerError::PoolClosed)?;
                customer.purchase(&store).await
            });
            (index, handle)
        })
        .collect();
    drop(store);

    let deadline = Instant::now() + settings.collect_timeout;
    let mut outcomes = Vec::with_capacity(handles.len());
    for (customer, mut handle) in handles {
        let outcome = match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(Ok(Purchase::Completed(order)))) => CustomerOutcome::Ordered(order),
            Ok(Ok(Ok(Purchase::Oversold { order, signal }))) => {
                warn!(customer, order_id = %order.id, error = %signal, "Customer oversold");
                CustomerOutcome::Oversold { order, signal }
            }
            Ok(Ok(Err(e))) => {
                warn!(customer, error = %e, "Customer failed");
                CustomerOutcome::Errored(e)
            }
            Ok(Err(join_error)) => {
                warn!(customer, error = %join_error, "Customer panicked");
                CustomerOutcome::Panicked(join_error.to_string())
            }
            Err(_) => {
                handle.abort();
                warn!(customer, "Customer timed out");
                CustomerOutcome::TimedOut
            }
        };
        outcomes.push(CustomerReport { customer, outcome });
    }

    let snapshot = system.ledger.snapshot().await;
    let tally = system
        .order_log
        .summarize()
        .await?
        .for_product(&request.product_id)
        .since(&tally_before);

    let overselling_signals = outcomes
        .iter()
        .filter(|report| matches!(report.outcome, CustomerOutcome::Oversold { .. }))
        .count();

    let report = SaleReport {
        product_id: request.product_id.clone(),
        mode: request.mode,
        customers: request.customers,
        initial_stock,
        final_stock: snapshot.stock(&request.product_id),
        units_sold: tally.confirmed_quantity,
        orders_recorded: tally.orders,
        confirmed_orders: tally.confirmed_orders,
        failed_insufficient: tally.failed_insufficient,
        failed_overselling: tally.failed_overselling,
        overselling_signals,
        outcomes,
        snapshot,
    };

    info!(
        product_id = %report.product_id,
        mode = %report.mode,
        initial_stock = report.initial_stock,
        final_stock = report.final_stock,
        units_sold = report.units_sold,
        confirmed = report.confirmed_orders,
        failed = report.failed_orders(),
        overselling_signals = report.overselling_signals,
        discrepancy = report.discrepancy(),
        "Flash sale finished"
    );
    if report.final_stock < 0 {
        warn!(product_id = %report.product_id, final_stock = report.final_stock, "Overselling confirmed");
    }

    Ok(report)
}
