//! # Mocking the Order Log
//!
//! Code that talks to the log (customers, the simulator) can be tested without
//! spawning an [`OrderLogActor`](super::OrderLogActor). [`create_mock_log`] returns a
//! real [`OrderLogClient`] wired to a receiver the test holds, and the `expect_*`
//! helpers pull the next request off it so the test can inspect it and answer it.
//!
//! ```rust
//! use flash_sale::model::{Order, OrderId, OrderStatus, ProductId, UserId};
//! use flash_sale::order_log::mock::{create_mock_log, expect_record};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (client, mut receiver) = create_mock_log(8);
//!
//!     let task = tokio::spawn(async move {
//!         let order = Order::new(
//!             OrderId(1),
//!             UserId::customer(1),
//!             ProductId::from("phone_002"),
//!             1,
//!             OrderStatus::Confirmed,
//!         );
//!         client.record(order).await
//!     });
//!
//!     let (order, responder) = expect_record(&mut receiver).await.expect("Expected Record request");
//!     assert_eq!(order.status, OrderStatus::Confirmed);
//!     responder.send(()).unwrap();
//!
//!     assert!(task.await.unwrap().is_ok());
//! }
//! ```

use super::message::{LogRequest, Response};
use super::{OrderLogClient, OrderSummary};
use crate::model::Order;
use tokio::sync::mpsc;

/// Creates a log client and the receiver its requests arrive on.
pub fn create_mock_log(buffer_size: usize) -> (OrderLogClient, mpsc::Receiver<LogRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderLogClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Record request
pub async fn expect_record(
    receiver: &mut mpsc::Receiver<LogRequest>,
) -> Option<(Order, Response<()>)> {
    match receiver.recv().await {
        Some(LogRequest::Record { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Summarize request
pub async fn expect_summarize(
    receiver: &mut mpsc::Receiver<LogRequest>,
) -> Option<Response<OrderSummary>> {
    match receiver.recv().await {
        Some(LogRequest::Summarize { respond_to }) => Some(respond_to),
        _ => None,
    }
}
