//! # Order Log
//!
//! An append-only record of every purchase attempt, built as a single actor:
//!
//! - [`OrderLogActor`] owns the `Vec<Order>` and handles requests one at a time.
//! - [`OrderLogClient`] is the cloneable handle customers use to `record` and the
//!   driver uses to `summarize`.
//!
//! Customers never need the ledger's exclusive guard to record; the channel is the
//! only synchronization.
//!
//! ```rust
//! use flash_sale::model::{Order, OrderId, OrderStatus, ProductId, UserId};
//! use flash_sale::order_log;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = order_log::new(32);
//!     let handle = tokio::spawn(actor.run());
//!
//!     let order = Order::new(
//!         OrderId(1),
//!         UserId::customer(7),
//!         ProductId::from("laptop_001"),
//!         2,
//!         OrderStatus::Confirmed,
//!     );
//!     client.record(order).await?;
//!
//!     let summary = client.summarize().await?;
//!     assert_eq!(summary.total, 1);
//!     assert_eq!(summary.confirmed_quantity, 2);
//!
//!     drop(client);
//!     handle.await?;
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod summary;

pub use actor::OrderLogActor;
pub use client::OrderLogClient;
pub use error::*;
pub use message::LogRequest;
pub use summary::*;

use tokio::sync::mpsc;

/// Creates a new order log actor and its client.
///
/// `buffer_size` bounds the request channel; callers wait for space when it is full.
pub fn new(buffer_size: usize) -> (OrderLogActor, OrderLogClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderLogActor::new(receiver), OrderLogClient::new(sender))
}
