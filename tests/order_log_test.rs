use flash_sale::model::{Order, OrderIdGenerator, OrderStatus, ProductId, UserId};
use flash_sale::order_log::{self, OrderLogError};
use std::collections::HashSet;
use std::sync::Arc;

fn status_for(n: u32) -> OrderStatus {
    match n % 3 {
        0 => OrderStatus::Confirmed,
        1 => OrderStatus::FailedInsufficientInventory,
        _ => OrderStatus::FailedOverselling,
    }
}

/// Many writers appending at once: nothing lost, nothing duplicated.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_records_are_all_kept() {
    let (actor, client) = order_log::new(8);
    let actor_handle = tokio::spawn(actor.run());
    let ids = Arc::new(OrderIdGenerator::new());

    let mut handles = vec![];
    for n in 0..120u32 {
        let client = client.clone();
        let ids = ids.clone();
        handles.push(tokio::spawn(async move {
            let order = Order::new(
                ids.next_id(),
                UserId::customer(n),
                ProductId::from("headphones_004"),
                1 + n % 2,
                status_for(n),
            );
            client.record(order).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("record should succeed");
    }

    let summary = client.summarize().await.unwrap();
    assert_eq!(summary.total, 120);
    assert_eq!(summary.confirmed, 40);
    assert_eq!(summary.failed_insufficient, 40);
    assert_eq!(summary.failed_overselling, 40);

    let orders = client.orders().await.unwrap();
    let unique: HashSet<_> = orders.iter().map(|order| order.id).collect();
    assert_eq!(unique.len(), 120, "order ids must be unique");

    drop(client);
    actor_handle.await.unwrap();
}

/// Records come back in the order they were acknowledged, untouched.
#[tokio::test]
async fn test_recorded_orders_are_not_modified() {
    let (actor, client) = order_log::new(4);
    let actor_handle = tokio::spawn(actor.run());
    let ids = OrderIdGenerator::new();

    let first = Order::new(ids.next_id(), UserId::from("user_a"), ProductId::from("laptop_001"), 2, OrderStatus::Confirmed);
    let second = Order::new(ids.next_id(), UserId::from("user_b"), ProductId::from("laptop_001"), 1, OrderStatus::FailedInsufficientInventory);
    client.record(first.clone()).await.unwrap();
    client.record(second.clone()).await.unwrap();

    assert_eq!(client.orders().await.unwrap(), vec![first, second]);

    let summary = client.summarize().await.unwrap();
    assert_eq!(summary.confirmed_quantity, 2);
    assert_eq!(summary.for_product(&ProductId::from("laptop_001")).orders, 2);

    drop(client);
    actor_handle.await.unwrap();
}

/// Once the actor is gone the client reports it instead of hanging.
#[tokio::test]
async fn test_record_after_shutdown_reports_closed() {
    let (actor, client) = order_log::new(4);
    drop(actor);

    let order = Order::new(
        OrderIdGenerator::new().next_id(),
        UserId::customer(1),
        ProductId::from("phone_002"),
        1,
        OrderStatus::Confirmed,
    );
    assert_eq!(client.record(order).await, Err(OrderLogError::Closed));
    assert_eq!(client.summarize().await, Err(OrderLogError::Closed));
}
