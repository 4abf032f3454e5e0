//! # Transfer Fraud Engine
//!
//! Ingests a batch of monetary transfers and emits ranked suspicion
//! alerts for three patterns:
//!
//! - closed transfer cycles (circular flows between accounts)
//! - deposit structuring / smurfing (bursts of similar-sized transfers)
//! - bridge-account centrality (accounts sitting between many others)
//!
//! The engine is single-writer and batch-oriented: build a
//! [`TransactionTable`], construct a [`FraudAnalysisEngine`], and call
//! [`FraudAnalysisEngine::analyze`]. Nothing mutates after construction.

pub mod alert;
pub mod centrality;
pub mod cycles;
pub mod error;
pub mod graph;
pub mod orchestrator;
pub mod structuring;
pub mod transaction;

pub use alert::{Alert, CycleAlert, HighCentralityAlert, StructuringAlert};
pub use centrality::{CentralityConfig, CentralityDetector};
pub use cycles::CycleDetector;
pub use error::{AnalysisError, AnalysisResult};
pub use graph::{Edge, TransferGraph};
pub use orchestrator::{AnalysisOrchestrator, AnalysisReport, AnalysisSummary, GraphStats};
pub use structuring::{StructuringConfig, StructuringDetector};
pub use transaction::{AccountId, Transaction, TransactionTable, TransferRecord};

/// Tunables for a single analysis run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    pub structuring_threshold_count: usize,
    pub structuring_threshold_hours: f64,
    pub centrality_top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            structuring_threshold_count: 5,
            structuring_threshold_hours: 48.0,
            centrality_top_n: 10,
        }
    }
}

impl AnalysisConfig {
    fn structuring_config(&self) -> StructuringConfig {
        StructuringConfig {
            threshold_count: self.structuring_threshold_count,
            threshold_hours: self.structuring_threshold_hours,
        }
    }

    fn centrality_config(&self) -> CentralityConfig {
        CentralityConfig {
            top_n: self.centrality_top_n,
        }
    }
}

/// Entry point: runs all three detectors over a transfer batch and
/// returns a ranked [`AnalysisReport`].
pub struct FraudAnalysisEngine {
    config: AnalysisConfig,
}

impl FraudAnalysisEngine {
    /// Create an engine with default thresholds.
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// Create an engine with custom thresholds.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run cycle, structuring, and centrality detection over `table` and
    /// return the combined, risk-sorted report.
    pub fn analyze(&self, table: &TransactionTable) -> AnalysisReport {
        AnalysisOrchestrator::run(
            table,
            &self.config.structuring_config(),
            &self.config.centrality_config(),
        )
    }
}

impl Default for FraudAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
