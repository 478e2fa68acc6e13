//! The canonical flash-sale runs and their pass/fail tally.
//!
//! Each scenario states what it expects to see. An unsafe run passes when it
//! reproduces overselling; a safe run passes when stock holds and the books balance.

use super::{run_flash_sale, SaleReport, SaleRequest, SimulationError};
use crate::ledger::ReservationMode;
use crate::lifecycle::{SaleConfig, SaleSystem};
use tracing::{info, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// The run should oversell: negative stock or an overselling signal.
    Overselling,
    /// The run should neither oversell nor lose track of a unit or a customer.
    NoOverselling,
}

impl Expectation {
    pub fn is_met(self, report: &SaleReport) -> bool {
        match self {
            Expectation::Overselling => report.oversold(),
            Expectation::NoOverselling => {
                !report.oversold()
                    && report.discrepancy() == 0
                    && report.customer_failures().next().is_none()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub request: SaleRequest,
    pub expectation: Expectation,
}

impl Scenario {
    pub fn new(name: impl Into<String>, request: SaleRequest, expectation: Expectation) -> Self {
        Self {
            name: name.into(),
            request,
            expectation,
        }
    }
}

/// Unsafe laptops, safe phones, then an extreme unsafe run on tablets.
pub fn flash_sale_suite() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "unsafe reservation",
            SaleRequest::new("laptop_001", 15, ReservationMode::Unsafe),
            Expectation::Overselling,
        ),
        Scenario::new(
            "safe reservation",
            SaleRequest::new("phone_002", 10, ReservationMode::Safe),
            Expectation::NoOverselling,
        ),
        Scenario::new(
            "extreme concurrency",
            SaleRequest::new("tablet_003", 50, ReservationMode::Unsafe),
            Expectation::Overselling,
        ),
    ]
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub expectation: Expectation,
    pub passed: bool,
    pub report: SaleReport,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|result| result.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }
}

/// Runs every scenario on its own freshly seeded [`SaleSystem`].
pub async fn run_suite(
    config: &SaleConfig,
    scenarios: &[Scenario],
) -> Result<SuiteReport, SimulationError> {
    let settings = config.settings();
    let mut suite = SuiteReport::default();

    for scenario in scenarios {
        let span = tracing::info_span!("scenario", name = %scenario.name);
        let report = async {
            let system = SaleSystem::new(config.ledger());
            let report = run_flash_sale(&system, &scenario.request, &settings).await;
            system.shutdown().await.map_err(SimulationError::Shutdown)?;
            report
        }
        .instrument(span)
        .await?;

        let passed = scenario.expectation.is_met(&report);
        if passed {
            info!(scenario = %scenario.name, expectation = ?scenario.expectation, "Scenario passed");
        } else {
            warn!(
                scenario = %scenario.name,
                expectation = ?scenario.expectation,
                final_stock = report.final_stock,
                discrepancy = report.discrepancy(),
                "Scenario failed"
            );
        }

        suite.results.push(ScenarioResult {
            name: scenario.name.clone(),
            expectation: scenario.expectation,
            passed,
            report,
        });
    }

    info!(passed = suite.passed(), failed = suite.failed(), "Suite finished");
    Ok(suite)
}
