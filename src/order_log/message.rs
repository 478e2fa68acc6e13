//! # Log Messages
//!
//! Requests sent from an [`OrderLogClient`](super::OrderLogClient) to the
//! [`OrderLogActor`](super::OrderLogActor). Every request carries a oneshot sender the
//! actor answers on once the request has been handled.

use super::OrderSummary;
use crate::model::Order;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the log actor.
pub type Response<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum LogRequest {
    /// Append an order; answered once it is stored.
    Record {
        order: Order,
        respond_to: Response<()>,
    },
    Summarize {
        respond_to: Response<OrderSummary>,
    },
    Orders {
        respond_to: Response<Vec<Order>>,
    },
}
