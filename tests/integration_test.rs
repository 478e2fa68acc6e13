use flash_sale::ledger::{InventoryLedger, Latency, RaceWindow, ReservationMode};
use flash_sale::lifecycle::{SaleConfig, SaleSystem};
use flash_sale::model::{flash_sale_catalog, ProductId};
use flash_sale::simulator::scenario::{flash_sale_suite, run_suite, Expectation};
use flash_sale::simulator::{run_flash_sale, CustomerOutcome, SaleRequest, SaleSettings};
use std::time::Duration;

/// Safe mode, 3 phones, 10 customers: exactly the stock is sold and the books balance.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_safe_flash_sale_sells_exactly_the_stock() {
    let ledger = InventoryLedger::new(flash_sale_catalog())
        .with_locked_latency(Latency::jitter(Duration::from_millis(1), Duration::from_millis(5)));
    let system = SaleSystem::new(ledger);
    let request = SaleRequest::new("phone_002", 10, ReservationMode::Safe);

    let report = run_flash_sale(&system, &request, &SaleSettings::default())
        .await
        .expect("sale should run");

    assert_eq!(report.initial_stock, 3);
    assert_eq!(report.confirmed_orders, 3);
    assert_eq!(report.failed_insufficient, 7);
    assert_eq!(report.failed_overselling, 0);
    assert_eq!(report.final_stock, 0);
    assert_eq!(report.discrepancy(), 0);
    assert_eq!(report.orders_recorded, 10);
    assert!(!report.oversold());
    assert_eq!(report.snapshot.confirmed_reservations(&ProductId::from("phone_002")), 3);
    assert_eq!(report.customer_failures().count(), 0);
    assert!(report.is_complete());

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Unsafe mode with a gate: every customer passes the check before anyone decrements.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unsafe_gate_drives_stock_negative() {
    let ledger = InventoryLedger::new(flash_sale_catalog()).with_race_window(RaceWindow::gate(15));
    let system = SaleSystem::new(ledger);
    let request = SaleRequest::new("tablet_003", 15, ReservationMode::Unsafe);

    let report = run_flash_sale(&system, &request, &SaleSettings::default())
        .await
        .expect("sale should run");

    assert_eq!(report.final_stock, -13);
    assert_eq!(report.confirmed_orders, 2);
    assert_eq!(report.failed_overselling, 13);
    assert_eq!(report.overselling_signals, 13);
    assert_eq!(report.units_sold, 2);
    assert_eq!(report.discrepancy(), -13);
    assert_eq!(report.orders_recorded, 15);
    assert!(report.oversold());

    for outcome in report.outcomes.iter().map(|r| &r.outcome) {
        if let CustomerOutcome::Oversold { signal, .. } = outcome {
            assert!(signal.is_overselling());
        }
    }

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Stock 2, 50 customers, a real delay in the race window: overselling shows up.
/// Timing based, so it only has to happen in one of several runs.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unsafe_race_reproduces_with_delay() {
    let mut oversold_runs = 0;

    for _ in 0..5 {
        let ledger = InventoryLedger::new(flash_sale_catalog())
            .with_race_window(Latency::jitter(Duration::from_millis(2), Duration::from_millis(10)));
        let system = SaleSystem::new(ledger);
        let request = SaleRequest::new("tablet_003", 50, ReservationMode::Unsafe);

        let report = run_flash_sale(&system, &request, &SaleSettings::default())
            .await
            .expect("sale should run");
        assert_eq!(report.orders_recorded, 50, "every attempt is logged exactly once");
        if report.oversold() {
            oversold_runs += 1;
        }

        system.shutdown().await.expect("Failed to shutdown system");
    }

    assert!(oversold_runs > 0, "expected overselling in at least one run");
}

/// Customers stuck past the deadline are reported and do not hold up the others.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stuck_customers_time_out() {
    // A gate that never fills.
    let ledger = InventoryLedger::new(flash_sale_catalog()).with_race_window(RaceWindow::gate(20));
    let system = SaleSystem::new(ledger);
    let request = SaleRequest::new("headphones_004", 5, ReservationMode::Unsafe);
    let settings = SaleSettings {
        collect_timeout: Duration::from_millis(200),
        ..SaleSettings::default()
    };

    let report = run_flash_sale(&system, &request, &settings)
        .await
        .expect("sale should run");

    assert_eq!(report.timed_out(), 5);
    assert!(!report.is_complete());
    assert_eq!(report.customer_failures().count(), 5);
    assert_eq!(report.orders_recorded, 0);
    assert_eq!(report.final_stock, 10);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Concurrency bound below the customer count still serves everyone.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_pool_serves_every_customer() {
    let system = SaleSystem::new(InventoryLedger::new(flash_sale_catalog()));
    let request = SaleRequest::new("headphones_004", 30, ReservationMode::Safe);
    let settings = SaleSettings {
        max_concurrency: 3,
        quantity_choices: vec![1, 2],
        ..SaleSettings::default()
    };

    let report = run_flash_sale(&system, &request, &settings)
        .await
        .expect("sale should run");

    assert_eq!(report.orders_recorded, 30);
    assert!(report.final_stock >= 0);
    assert_eq!(report.discrepancy(), 0);
    assert!(report.units_sold <= 10);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// The canonical suite: the safe scenario always holds, the unsafe ones oversell.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_scenario_suite() {
    let config = SaleConfig {
        race_window: Latency::Fixed { ms: 20 },
        quantity_choices: vec![1],
        ..SaleConfig::for_test()
    };
    let scenarios = flash_sale_suite();

    let mut unsafe_reproduced = 0;
    for _ in 0..3 {
        let suite = run_suite(&config, &scenarios).await.expect("suite should run");
        assert_eq!(suite.results.len(), 3);

        for result in &suite.results {
            match result.expectation {
                Expectation::NoOverselling => {
                    assert!(result.passed, "safe scenario must hold: {:?}", result.report);
                    assert_eq!(result.report.final_stock, 0);
                }
                Expectation::Overselling => {
                    if result.passed {
                        unsafe_reproduced += 1;
                    }
                }
            }
        }
    }

    assert!(unsafe_reproduced > 0, "unsafe scenarios should oversell at least once");
}
