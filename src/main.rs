//! # Flash Sale Demo
//!
//! Runs the canonical scenario suite:
//! 1.  Unsafe reservations on laptops (expected to oversell).
//! 2.  Safe reservations on phones (expected to hold).
//! 3.  Unsafe reservations on tablets with 50 customers (expected to oversell).
//!
//! Exits with an error when any scenario does not behave as expected.

use flash_sale::lifecycle::{setup_tracing, SaleConfig};
use flash_sale::simulator::scenario::{flash_sale_suite, run_suite};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SaleConfig::load(None).map_err(|e| e.to_string())?;
    info!(products = config.catalog.len(), "Starting flash sale scenarios");

    let suite = run_suite(&config, &flash_sale_suite())
        .await
        .map_err(|e| e.to_string())?;

    for result in &suite.results {
        let report = &result.report;
        info!(
            scenario = %result.name,
            passed = result.passed,
            initial_stock = report.initial_stock,
            final_stock = report.final_stock,
            units_sold = report.units_sold,
            confirmed = report.confirmed_orders,
            failed = report.failed_orders(),
            overselling_signals = report.overselling_signals,
            discrepancy = report.discrepancy(),
            "Result"
        );
    }

    if suite.failed() > 0 {
        error!(failed = suite.failed(), "Scenarios did not behave as expected");
        return Err(format!("{} of {} scenarios failed", suite.failed(), suite.results.len()));
    }

    info!(passed = suite.passed(), "All scenarios behaved as expected");
    Ok(())
}
