//! Runs all three detectors over a batch and assembles the report.

use crate::alert::Alert;
use crate::centrality::{CentralityConfig, CentralityDetector};
use crate::cycles::CycleDetector;
use crate::graph::TransferGraph;
use crate::structuring::{StructuringConfig, StructuringDetector};
use crate::transaction::TransactionTable;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, info};

/// Per-pattern-type counts and graph shape, attached to every report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisSummary {
    pub cycles_detected: usize,
    pub structuring_detected: usize,
    pub high_risk_accounts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
}

/// The full output of a single analysis run.
///
/// `detector_errors` carries one message per detector that panicked:
/// an isolated detector failure is logged and skipped rather than
/// aborting the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisReport {
    pub total_alerts: usize,
    pub alerts: Vec<Alert>,
    pub summary: AnalysisSummary,
    pub graph_stats: GraphStats,
    pub detector_errors: Vec<String>,
}

pub struct AnalysisOrchestrator;

impl AnalysisOrchestrator {
    pub fn run(
        table: &TransactionTable,
        structuring_config: &StructuringConfig,
        centrality_config: &CentralityConfig,
    ) -> AnalysisReport {
        let graph = TransferGraph::build(table.as_slice());

        let cycles = run_detector("cycles", || CycleDetector::detect(&graph));
        let structuring = run_detector("structuring", || {
            StructuringDetector::detect(table, structuring_config)
        });
        let centrality = run_detector("centrality", || {
            CentralityDetector::detect(&graph, centrality_config)
        });

        assemble(&graph, cycles, structuring, centrality)
    }
}

/// Merges the three detectors' (possibly failed) results into a single
/// sorted report. Split out from `run` so the panic-isolation path can be
/// exercised directly with a forced `Err` in tests.
fn assemble(
    graph: &TransferGraph,
    cycles: Result<Vec<Alert>, String>,
    structuring: Result<Vec<Alert>, String>,
    centrality: Result<Vec<Alert>, String>,
) -> AnalysisReport {
    let mut alerts = Vec::new();
    let mut detector_errors = Vec::new();
    let mut cycles_detected = 0;
    let mut structuring_detected = 0;
    let mut high_risk_accounts = 0;

    match cycles {
        Ok(found) => {
            cycles_detected = found.len();
            alerts.extend(found);
        }
        Err(reason) => detector_errors.push(reason),
    }

    match structuring {
        Ok(found) => {
            structuring_detected = found.len();
            alerts.extend(found);
        }
        Err(reason) => detector_errors.push(reason),
    }

    match centrality {
        Ok(found) => {
            high_risk_accounts = found.len();
            alerts.extend(found);
        }
        Err(reason) => detector_errors.push(reason),
    }

    alerts.sort_by(|a, b| b.risk_score().cmp(&a.risk_score()));

    info!(
        alerts = alerts.len(),
        cycles_detected,
        structuring_detected,
        high_risk_accounts,
        "analysis run complete"
    );

    AnalysisReport {
        total_alerts: alerts.len(),
        alerts,
        summary: AnalysisSummary {
            cycles_detected,
            structuring_detected,
            high_risk_accounts,
        },
        graph_stats: GraphStats {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            density: crate::alert::round_to(graph.density(), 4),
        },
        detector_errors,
    }
}

/// Runs a single detector, converting a panic into a logged, isolated
/// `InternalFailure` rather than letting it take down the whole batch.
fn run_detector<F>(name: &str, detector: F) -> Result<Vec<Alert>, String>
where
    F: FnOnce() -> Vec<Alert>,
{
    match catch_unwind(AssertUnwindSafe(detector)) {
        Ok(alerts) => Ok(alerts),
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(detector = name, reason = %reason, "detector failed, skipping");
            Err(format!("{name}: {reason}"))
        }
    }
}
