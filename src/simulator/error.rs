//! Error types for the flash-sale simulator.

use crate::ledger::LedgerError;
use crate::model::ProductId;
use crate::order_log::OrderLogError;
use thiserror::Error;

/// Why a single customer could not complete a purchase attempt.
///
/// Overselling is not listed: it is a recorded outcome, see
/// [`Purchase::Oversold`](super::Purchase::Oversold).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    OrderLog(#[from] OrderLogError),

    #[error("Customer pool closed")]
    PoolClosed,
}

/// Errors that stop a whole sale from running or being reported.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Product not in the ledger: {0}")]
    UnknownProduct(ProductId),

    #[error("Invalid sale settings: {0}")]
    InvalidSettings(String),

    #[error("Order log unavailable: {0}")]
    OrderLog(#[from] OrderLogError),

    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}
