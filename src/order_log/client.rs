//! # Order Log Client
//!
//! A cheap-to-clone handle for talking to the [`OrderLogActor`](super::OrderLogActor).
//! Hand one clone to every customer task.

use super::message::LogRequest;
use super::{OrderLogError, OrderSummary};
use crate::model::Order;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct OrderLogClient {
    sender: mpsc::Sender<LogRequest>,
}

impl OrderLogClient {
    pub fn new(sender: mpsc::Sender<LogRequest>) -> Self {
        Self { sender }
    }

    /// Appends `order` and waits until the log has stored it.
    #[instrument(skip(self, order), fields(order_id = %order.id, status = %order.status))]
    pub async fn record(&self, order: Order) -> Result<(), OrderLogError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LogRequest::Record { order, respond_to })
            .await
            .map_err(|_| OrderLogError::Closed)?;
        response.await.map_err(|_| OrderLogError::Dropped)
    }

    /// Aggregates everything recorded so far.
    #[instrument(skip(self))]
    pub async fn summarize(&self) -> Result<OrderSummary, OrderLogError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LogRequest::Summarize { respond_to })
            .await
            .map_err(|_| OrderLogError::Closed)?;
        response.await.map_err(|_| OrderLogError::Dropped)
    }

    /// A copy of every recorded order, in append order.
    pub async fn orders(&self) -> Result<Vec<Order>, OrderLogError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LogRequest::Orders { respond_to })
            .await
            .map_err(|_| OrderLogError::Closed)?;
        response.await.map_err(|_| OrderLogError::Dropped)
    }
}
