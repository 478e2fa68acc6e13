#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Flash Sale
//!
//! > **An inventory race condition you can reproduce on demand.**
//!
//! This crate stages a flash sale: a handful of units, many more customers, all of them
//! buying at once. The same ledger can take reservations two ways, and the point is the
//! difference between them.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Safe vs Unsafe, side by side
//!
//! - **Safe**: check and decrement happen under one exclusive guard. Stock never goes
//!   negative and every unit taken belongs to a confirmed order.
//! - **Unsafe**: check, wait, decrement. Anyone who checked during the wait also gets
//!   through. Stock goes negative and the ledger says so with
//!   [`LedgerError::OversellingDetected`](ledger::LedgerError::OversellingDetected).
//!
//! The unsafe path is not a bug to fix. It is the defect a runtime monitor is expected
//! to catch, and the crate makes it happen reliably: the wait between check and
//! decrement is a configurable [`RaceWindow`](ledger::RaceWindow), down to a gate that
//! lines customers up deterministically.
//!
//! ## 🚀 Core Concepts
//!
//! ### Expected outcomes are values, defects are errors
//! Running out of stock is normal: `reserve` returns
//! [`Reservation::Rejected`](ledger::Reservation::Rejected). Only overselling and
//! malformed requests are errors.
//!
//! ### The discrepancy
//! After a sale the simulator compares final stock to `initial - units sold by
//! confirmed orders`. Zero under safe mode, negative whenever unsafe mode oversold.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. No globals
//! The ledger is an explicit [`InventoryLedger`](ledger::InventoryLedger) built from
//! seed data and shared through an `Arc`.
//!
//! ### 2. Order log as an actor
//! The [`order_log`] is a single Tokio task owning the log. Customers record through a
//! cloneable client, so concurrent appends need no lock on the caller's side.
//!
//! ### 3. Customers as tasks
//! Each customer is a Tokio task bounded by a semaphore. Results come back as
//! structured [`CustomerReport`](simulator::CustomerReport)s; one customer failing or
//! hanging never hides the others.
//!
//! ### 4. Observability
//! `tracing` throughout. See [`lifecycle::tracing`].
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: products, orders and their identifiers.
//! - [`ledger`]: the inventory and its two reservation paths.
//! - [`order_log`]: the append-only order record and its summary.
//! - [`simulator`]: the flash-sale driver and the canonical scenario suite.
//! - [`lifecycle`]: system wiring, configuration and tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the scenario suite with info logs
//! RUST_LOG=info cargo run
//!
//! # Override a knob from the environment
//! FLASH_SALE__MAX_CONCURRENCY=5 cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod order_log;
pub mod simulator;
