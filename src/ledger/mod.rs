//! # Inventory Ledger
//!
//! The ledger owns the stock count of every product in the sale and is the only thing
//! allowed to change it. It offers two reservation paths over the same state:
//!
//! | Mode | Check-then-decrement | Stock can go negative |
//! |------|----------------------|-----------------------|
//! | [`ReservationMode::Safe`] | under the ledger's exclusive guard | never |
//! | [`ReservationMode::Unsafe`] | read, pass the [`RaceWindow`], decrement | yes, and it is reported |
//!
//! ## Concurrency Model
//!
//! Products are fixed at construction, so the product map itself is never written
//! after `new()` and needs no lock. Each stock count is an `AtomicI64`:
//!
//! - The **safe** path takes a `tokio::sync::Mutex<()>` for the whole
//!   check / latency / decrement sequence, so safe reservations serialize.
//! - The **unsafe** path takes no guard at all. Between its read and its decrement any
//!   number of other reservers may pass the same check; the decrement then lands on
//!   whatever the stock has become. That lost check is the defect this crate exists to
//!   reproduce, and the atomic keeps it a logic race rather than a data race.
//! - [`InventoryLedger::snapshot`] takes the same guard as the safe path, so it never
//!   observes a safe reservation halfway through.
//!
//! ## Usage
//!
//! ```rust
//! use flash_sale::ledger::{InventoryLedger, Reservation, ReservationMode};
//! use flash_sale::model::{ProductId, ProductSeed};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ledger = InventoryLedger::new(vec![ProductSeed::new("phone_002", "Smartphone", 899.99, 3)]);
//!     let phone = ProductId::from("phone_002");
//!
//!     let outcome = ledger.reserve(&phone, 2, ReservationMode::Safe).await.unwrap();
//!     assert_eq!(outcome, Reservation::Confirmed { remaining: 1 });
//!
//!     let outcome = ledger.reserve(&phone, 2, ReservationMode::Safe).await.unwrap();
//!     assert_eq!(outcome, Reservation::Rejected { available: 1 });
//!     assert_eq!(ledger.get_stock(&phone), 1);
//! }
//! ```

pub mod error;
pub mod timing;

pub use error::*;
pub use timing::*;

use crate::model::{Product, ProductId, ProductSeed};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Selects how a reservation is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationMode {
    /// Check and decrement under the ledger's exclusive guard.
    Safe,
    /// Check, pass the race window, then decrement without re-checking.
    Unsafe,
}

impl Display for ReservationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationMode::Safe => f.write_str("SAFE"),
            ReservationMode::Unsafe => f.write_str("UNSAFE"),
        }
    }
}

/// Normal outcome of [`InventoryLedger::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The quantity was available and has been taken.
    Confirmed { remaining: i64 },
    /// Not enough stock; nothing was changed.
    Rejected { available: i64 },
}

impl Reservation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Reservation::Confirmed { .. })
    }
}

/// Stock and confirmed-reservation count for one product inside a [`LedgerSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct StockLevel {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub confirmed_reservations: u64,
}

/// A consistent view of the whole ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub taken_at: DateTime<Utc>,
    pub products: BTreeMap<ProductId, StockLevel>,
}

impl LedgerSnapshot {
    /// Stock of `product_id` at snapshot time, 0 if unknown.
    pub fn stock(&self, product_id: &ProductId) -> i64 {
        self.products.get(product_id).map_or(0, |level| level.stock)
    }

    pub fn confirmed_reservations(&self, product_id: &ProductId) -> u64 {
        self.products
            .get(product_id)
            .map_or(0, |level| level.confirmed_reservations)
    }
}

struct StockEntry {
    name: String,
    price: f64,
    stock: AtomicI64,
    confirmed: AtomicU64,
}

/// Per-product stock with safe and unsafe reservation paths.
///
/// Share it between customers behind an `Arc`; every operation takes `&self`.
pub struct InventoryLedger {
    entries: HashMap<ProductId, StockEntry>,
    exclusive: Mutex<()>,
    race_window: RaceWindow,
    locked_latency: Latency,
}

impl InventoryLedger {
    /// Builds a ledger from seed data with no artificial delays.
    ///
    /// A seed repeating an earlier id replaces it.
    pub fn new(seeds: impl IntoIterator<Item = ProductSeed>) -> Self {
        let entries = seeds
            .into_iter()
            .map(|seed| {
                let entry = StockEntry {
                    name: seed.name,
                    price: seed.price,
                    stock: AtomicI64::new(i64::from(seed.stock)),
                    confirmed: AtomicU64::new(0),
                };
                (seed.id, entry)
            })
            .collect();

        Self {
            entries,
            exclusive: Mutex::new(()),
            race_window: RaceWindow::default(),
            locked_latency: Latency::None,
        }
    }

    /// Sets the pause the unsafe path takes between its check and its decrement.
    pub fn with_race_window(mut self, window: impl Into<RaceWindow>) -> Self {
        self.race_window = window.into();
        self
    }

    /// Sets the pause the safe path takes while holding the exclusive guard.
    pub fn with_locked_latency(mut self, latency: Latency) -> Self {
        self.locked_latency = latency;
        self
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.contains_key(product_id)
    }

    pub fn product(&self, product_id: &ProductId) -> Option<Product> {
        self.entries.get(product_id).map(|entry| {
            Product::new(
                product_id.clone(),
                entry.name.clone(),
                entry.price,
                entry.stock.load(Ordering::SeqCst),
            )
        })
    }

    /// Current stock of `product_id`, or 0 for an unknown product.
    pub fn get_stock(&self, product_id: &ProductId) -> i64 {
        self.entries
            .get(product_id)
            .map_or(0, |entry| entry.stock.load(Ordering::SeqCst))
    }

    /// Attempts to take `quantity` units of `product_id`.
    ///
    /// # Errors
    /// - [`LedgerError::MalformedRequest`] for an unknown product or a zero quantity.
    /// - [`LedgerError::OversellingDetected`] when an unsafe decrement leaves the stock
    ///   negative. The decrement is not rolled back.
    #[instrument(skip(self), fields(%product_id))]
    pub async fn reserve(
        &self,
        product_id: &ProductId,
        quantity: u32,
        mode: ReservationMode,
    ) -> Result<Reservation, LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::MalformedRequest {
                product_id: product_id.clone(),
                reason: MalformedReason::NonPositiveQuantity(quantity),
            });
        }
        let entry = self
            .entries
            .get(product_id)
            .ok_or_else(|| LedgerError::MalformedRequest {
                product_id: product_id.clone(),
                reason: MalformedReason::UnknownProduct,
            })?;

        match mode {
            ReservationMode::Safe => Ok(self.reserve_exclusive(entry, quantity).await),
            ReservationMode::Unsafe => self.reserve_racy(product_id, entry, quantity).await,
        }
    }

    async fn reserve_exclusive(&self, entry: &StockEntry, quantity: u32) -> Reservation {
        let _guard = self.exclusive.lock().await;
        let requested = i64::from(quantity);

        let available = entry.stock.load(Ordering::SeqCst);
        if available < requested {
            debug!(available, "Rejected");
            return Reservation::Rejected { available };
        }

        self.locked_latency.pause().await;

        let remaining = entry.stock.fetch_sub(requested, Ordering::SeqCst) - requested;
        entry.confirmed.fetch_add(1, Ordering::SeqCst);
        debug!(remaining, "Reserved");
        Reservation::Confirmed { remaining }
    }

    async fn reserve_racy(
        &self,
        product_id: &ProductId,
        entry: &StockEntry,
        quantity: u32,
    ) -> Result<Reservation, LedgerError> {
        let requested = i64::from(quantity);

        let observed = entry.stock.load(Ordering::SeqCst);
        if observed < requested {
            debug!(available = observed, "Rejected");
            return Ok(Reservation::Rejected {
                available: observed,
            });
        }

        // Other reservers may pass the same check while this one waits.
        self.race_window.pass().await;

        let remaining = entry.stock.fetch_sub(requested, Ordering::SeqCst) - requested;
        if remaining < 0 {
            warn!(observed, remaining, "Overselling detected");
            return Err(LedgerError::OversellingDetected {
                product_id: product_id.clone(),
                quantity,
                resulting_stock: remaining,
            });
        }

        entry.confirmed.fetch_add(1, Ordering::SeqCst);
        debug!(observed, remaining, "Reserved");
        Ok(Reservation::Confirmed { remaining })
    }

    /// Stock and confirmed-reservation counts for every product.
    ///
    /// Taken under the same guard as safe reservations.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let _guard = self.exclusive.lock().await;
        let products = self
            .entries
            .iter()
            .map(|(id, entry)| {
                let level = StockLevel {
                    name: entry.name.clone(),
                    price: entry.price,
                    stock: entry.stock.load(Ordering::SeqCst),
                    confirmed_reservations: entry.confirmed.load(Ordering::SeqCst),
                };
                (id.clone(), level)
            })
            .collect();

        LedgerSnapshot {
            taken_at: Utc::now(),
            products,
        }
    }
}
