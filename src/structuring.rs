//! Deposit structuring (smurfing) detection: a sliding-window scan over
//! each source account's outgoing transfer timeline.

use crate::alert::{round_to, Alert, StructuringAlert};
use crate::transaction::{AccountId, Transaction, TransactionTable};
use std::collections::HashMap;
use tracing::debug;

const MIN_SCORE: u32 = 50;

/// Tunables for the sliding-window scan.
#[derive(Debug, Clone, Copy)]
pub struct StructuringConfig {
    pub threshold_count: usize,
    pub threshold_hours: f64,
}

impl Default for StructuringConfig {
    fn default() -> Self {
        Self {
            threshold_count: 5,
            threshold_hours: 48.0,
        }
    }
}

pub struct StructuringDetector;

impl StructuringDetector {
    pub fn detect(table: &TransactionTable, config: &StructuringConfig) -> Vec<Alert> {
        let mut by_account: HashMap<&AccountId, Vec<&Transaction>> = HashMap::new();
        for transfer in table.iter() {
            by_account.entry(&transfer.from).or_default().push(transfer);
        }

        let mut alerts = Vec::new();
        for (account, mut transfers) in by_account {
            if transfers.len() < config.threshold_count {
                continue;
            }
            transfers.sort_by_key(|t| t.timestamp);

            if let Some(alert) = scan_account(account, &transfers, config) {
                alerts.push(Alert::Structuring(alert));
            }
        }

        debug!(alerts = alerts.len(), "structuring scan complete");
        alerts
    }
}

fn scan_account(
    account: &AccountId,
    transfers: &[&Transaction],
    config: &StructuringConfig,
) -> Option<StructuringAlert> {
    let window_size = config.threshold_count;

    for window in transfers.windows(window_size) {
        let time_diff_hours =
            (window[window_size - 1].timestamp - window[0].timestamp).num_seconds() as f64 / 3600.0;
        if time_diff_hours > config.threshold_hours {
            continue;
        }

        let amounts: Vec<f64> = window.iter().map(|t| t.amount).collect();
        let total: f64 = amounts.iter().sum();
        let avg = total / amounts.len() as f64;
        let max = amounts.iter().cloned().fold(f64::MIN, f64::max);
        let min = amounts.iter().cloned().fold(f64::MAX, f64::min);
        let variation = if avg > 0.0 { (max - min) / avg } else { 0.0 };
        let similar_amounts = variation < 0.30;

        let mut score = 0u32;
        score += (window_size as u32 * 8).min(40);

        if time_diff_hours < 6.0 {
            score += 30;
        } else if time_diff_hours < 24.0 {
            score += 20;
        } else if time_diff_hours < 48.0 {
            score += 10;
        }

        if similar_amounts {
            score += 25;
        }

        if avg < 3000.0 && total > 15_000.0 {
            score += 20;
        }

        let risk_score = score.min(100);

        if risk_score >= MIN_SCORE {
            return Some(StructuringAlert {
                account: account.clone(),
                num_transactions: window_size,
                total_amount: round_to(total, 2),
                avg_amount: round_to(avg, 2),
                amount_variation_percent: round_to(variation * 100.0, 2),
                time_window_hours: round_to(time_diff_hours, 2),
                similar_amounts,
                risk_score: risk_score as u8,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn txn(id: &str, from: &str, to: &str, amount: f64, offset_minutes: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            timestamp: Utc::now() + Duration::minutes(offset_minutes),
        }
    }

    #[test]
    fn structuring_alert_emitted_for_similar_amount_burst() {
        let amounts = [2000.0, 2100.0, 1950.0, 2050.0, 1900.0, 2020.0];
        let table = TransactionTable::new(
            amounts
                .iter()
                .enumerate()
                .map(|(i, &amt)| {
                    txn(
                        &format!("T{i}"),
                        "A",
                        &format!("R{i}"),
                        amt,
                        (i as i64) * 40,
                    )
                })
                .collect(),
        );

        let config = StructuringConfig::default();
        let alerts = StructuringDetector::detect(&table, &config);
        assert_eq!(alerts.len(), 1);
        let Alert::Structuring(alert) = &alerts[0] else {
            panic!("expected structuring alert")
        };
        assert_eq!(alert.account, "A");
        assert_eq!(alert.num_transactions, 5);
        assert!(alert.similar_amounts);
        assert!(alert.risk_score >= 50);
        assert!(alert.time_window_hours <= config.threshold_hours);
    }

    #[test]
    fn below_threshold_count_emits_nothing() {
        let table = TransactionTable::new(vec![
            txn("T1", "A", "B", 1000.0, 0),
            txn("T2", "A", "C", 1000.0, 10),
        ]);
        let alerts = StructuringDetector::detect(&table, &StructuringConfig::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn at_most_one_alert_per_account() {
        let amounts = [
            2000.0, 2100.0, 1950.0, 2050.0, 1900.0, 2020.0, 1980.0, 2010.0,
        ];
        let table = TransactionTable::new(
            amounts
                .iter()
                .enumerate()
                .map(|(i, &amt)| {
                    txn(&format!("T{i}"), "A", &format!("R{i}"), amt, (i as i64) * 30)
                })
                .collect(),
        );
        let alerts = StructuringDetector::detect(&table, &StructuringConfig::default());
        let from_a = alerts
            .iter()
            .filter(|a| matches!(a, Alert::Structuring(s) if s.account == "A"))
            .count();
        assert_eq!(from_a, 1);
    }
}
