//! Error taxonomy for the fraud analysis engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors the engine can surface.
///
/// `InvalidRecord` fails the whole analysis. `GraphInvariantViolation` is
/// never returned to a caller — it is logged and the offending cycle is
/// dropped — but the variant exists so the taxonomy has one source of
/// truth and so tests can assert on the log-and-skip behavior.
/// `InternalFailure` is reported per-detector inside the report rather
/// than propagated (see `AnalysisReport::detector_errors`).
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisError {
    #[error("invalid transfer record {transaction_id}: {reason}")]
    InvalidRecord {
        transaction_id: String,
        reason: String,
    },

    #[error("graph invariant violation: edge {from} -> {to} missing from built graph")]
    GraphInvariantViolation { from: String, to: String },

    #[error("internal failure in {detector}: {reason}")]
    InternalFailure { detector: String, reason: String },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
