//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the `tracing` subscriber for the demo binary.
//!
//! ## Configuration
//!
//! Verbosity comes from `RUST_LOG` and defaults to `info`. The compact format hides
//! module paths (`with_target(false)`) and shows spans inline, so a reservation made
//! by a customer reads as `customer:reserve{product_id=tablet_003}: Reserved`.
//!
//! ## What Gets Traced
//!
//! - **Order log lifecycle**: startup and shutdown with the final log size
//! - **Reservations**: `debug` for every confirm or reject, `warn` for overselling
//! - **Customers**: `warn` for customers that errored, panicked or timed out
//! - **Sale results**: one `info` line per sale with stock, sales and discrepancy
//!
//! ## Usage Examples
//!
//! ```bash
//! # Sale results only
//! RUST_LOG=info cargo run
//!
//! # Every reservation decision
//! RUST_LOG=flash_sale::ledger=debug cargo run
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();
}
