//! # Order Log Actor
//!
//! The actor owns the log and the receiving end of its channel. It handles one
//! request at a time, so appends from any number of concurrent customers land in the
//! log whole and in some total order without the callers holding any lock.

use super::message::LogRequest;
use super::OrderSummary;
use crate::model::Order;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The "server" half of the order log.
///
/// Run it with [`OrderLogActor::run`] in its own task; it stops once every
/// [`OrderLogClient`](super::OrderLogClient) has been dropped.
pub struct OrderLogActor {
    receiver: mpsc::Receiver<LogRequest>,
    orders: Vec<Order>,
}

impl OrderLogActor {
    pub(super) fn new(receiver: mpsc::Receiver<LogRequest>) -> Self {
        Self {
            receiver,
            orders: Vec::new(),
        }
    }

    /// Processes requests until the channel closes.
    pub async fn run(mut self) {
        info!("Order log started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LogRequest::Record { order, respond_to } => {
                    debug_assert!(
                        !order.user_id.as_str().is_empty() && !order.product_id.as_str().is_empty(),
                        "orders must name a user and a product"
                    );
                    debug!(order_id = %order.id, user_id = %order.user_id, status = %order.status, "Record");
                    self.orders.push(order);
                    let _ = respond_to.send(());
                }
                LogRequest::Summarize { respond_to } => {
                    let summary = OrderSummary::from_orders(&self.orders);
                    debug!(total = summary.total, confirmed = summary.confirmed, "Summarize");
                    let _ = respond_to.send(summary);
                }
                LogRequest::Orders { respond_to } => {
                    let _ = respond_to.send(self.orders.clone());
                }
            }
        }

        info!(size = self.orders.len(), "Order log shutdown");
    }
}
