//! Alert payload types emitted by the three detectors.

use crate::transaction::{AccountId, Transaction};
use serde::{Deserialize, Serialize};

/// A tagged suspicion alert. `risk_score` always lies in `[0, 100]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Alert {
    Cycle(CycleAlert),
    Structuring(StructuringAlert),
    HighCentrality(HighCentralityAlert),
}

impl Alert {
    pub fn risk_score(&self) -> u8 {
        match self {
            Alert::Cycle(a) => a.risk_score,
            Alert::Structuring(a) => a.risk_score,
            Alert::HighCentrality(a) => a.risk_score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleAlert {
    pub accounts: Vec<AccountId>,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub time_span_hours: f64,
    pub num_transactions: usize,
    pub amount_variation_percent: f64,
    pub risk_score: u8,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuringAlert {
    pub account: AccountId,
    pub num_transactions: usize,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub amount_variation_percent: f64,
    pub time_window_hours: f64,
    pub similar_amounts: bool,
    pub risk_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighCentralityAlert {
    pub account: AccountId,
    pub betweenness: f64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub total_in_amount: f64,
    pub total_out_amount: f64,
    pub is_balanced_bridge: bool,
    pub risk_score: u8,
}

/// Round to `decimals` places, as used when emitting report fields
/// (monetary sums/averages: 2, variation/time-hours: 2, betweenness/density: 4).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
