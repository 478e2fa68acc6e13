//! Error types for the Inventory Ledger.

use crate::model::ProductId;
use thiserror::Error;

/// Conditions signaled by [`InventoryLedger::reserve`](super::InventoryLedger::reserve).
///
/// A rejected reservation is not an error; it is reported as
/// [`Reservation::Rejected`](super::Reservation::Rejected).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// An unsafe reservation drove stock below zero. The decrement stays applied.
    #[error("Overselling detected: {product_id} stock is now {resulting_stock} after reserving {quantity}")]
    OversellingDetected {
        product_id: ProductId,
        quantity: u32,
        resulting_stock: i64,
    },

    /// The caller broke the reservation contract.
    #[error("Malformed request for {product_id}: {reason}")]
    MalformedRequest {
        product_id: ProductId,
        reason: MalformedReason,
    },
}

impl LedgerError {
    pub fn is_overselling(&self) -> bool {
        matches!(self, LedgerError::OversellingDetected { .. })
    }
}

/// Why a reservation request was refused before touching stock.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("unknown product")]
    UnknownProduct,
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(u32),
}
