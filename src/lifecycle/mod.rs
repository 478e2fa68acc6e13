//! # Sale Lifecycle
//!
//! Wiring that surrounds a flash sale but is not part of it:
//!
//! - [`SaleSystem`] spins up the order log actor next to a ledger and shuts it down
//!   cleanly once the sale is over.
//! - [`SaleConfig`] loads seed data and timing knobs from YAML and the environment.
//! - [`setup_tracing`] installs the log subscriber for the demo binary.
//!
//! ## Graceful Shutdown
//!
//! The order log follows the actor shutdown pattern: drop every client, the actor's
//! `recv()` returns `None`, it logs its final size and exits, and
//! [`SaleSystem::shutdown`] awaits the task. Customer tasks hold client clones, so the
//! simulator makes sure each one has finished or been aborted before it returns.

pub mod config;
pub mod sale_system;
pub mod tracing;

pub use self::config::*;
pub use sale_system::*;
pub use self::tracing::*;
