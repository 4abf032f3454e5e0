//! Transfer records and the immutable batch the engine operates over.

use crate::error::AnalysisError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Opaque account identifier. Comparable and hashable; the engine never
/// interprets its structure beyond equality.
pub type AccountId = String;

/// A single transfer, already validated and timestamp-parsed.
///
/// Fraud-label fields an external feed might carry alongside a transfer
/// are not represented here — the conversion from [`TransferRecord`]
/// drops anything the engine doesn't need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Raw record shape an ingestion adapter hands to the engine.
///
/// `timestamp` is ISO-8601 with no timezone offset assumed; the engine
/// parses it to an instant at the [`TransactionTable::from_records`]
/// boundary. Any other columns a source table carries (fraud labels,
/// pattern tags) simply aren't part of this struct and are dropped by
/// construction — the adapter that deserializes into `TransferRecord`
/// tolerates and ignores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub transaction_id: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: f64,
    pub timestamp: String,
}

/// Read-only batch of transfers the engine analyzes.
///
/// Nothing mutates a `TransactionTable` after construction; `TransferGraph`
/// and every detector hold only shared references to it.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    transactions: Vec<Transaction>,
}

impl TransactionTable {
    /// Build a table directly from already-parsed transactions.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Parse and validate a batch of raw records, failing the entire
    /// analysis on the first bad record (per the `InvalidRecord` policy).
    pub fn from_records(records: Vec<TransferRecord>) -> Result<Self, AnalysisError> {
        let mut transactions = Vec::with_capacity(records.len());
        for record in records {
            transactions.push(parse_record(record)?);
        }
        Ok(Self { transactions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Outgoing transfers for a single account, in table (insertion) order.
    pub fn outgoing(&self, account: &str) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| t.from == account)
    }
}

fn parse_record(record: TransferRecord) -> Result<Transaction, AnalysisError> {
    if record.amount < 0.0 {
        return Err(AnalysisError::InvalidRecord {
            transaction_id: record.transaction_id,
            reason: format!("negative amount {}", record.amount),
        });
    }
    if record.from_account.is_empty() || record.to_account.is_empty() {
        return Err(AnalysisError::InvalidRecord {
            transaction_id: record.transaction_id,
            reason: "missing from_account or to_account".to_string(),
        });
    }

    let naive = parse_naive_timestamp(&record.timestamp).ok_or_else(|| {
        warn!(
            transaction_id = %record.transaction_id,
            timestamp = %record.timestamp,
            "failed to parse transfer timestamp"
        );
        AnalysisError::InvalidRecord {
            transaction_id: record.transaction_id.clone(),
            reason: format!("malformed timestamp '{}'", record.timestamp),
        }
    })?;

    Ok(Transaction {
        id: record.transaction_id,
        from: record.from_account,
        to: record.to_account,
        amount: record.amount,
        timestamp: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
    })
}

/// Parse a naive ISO-8601-ish timestamp, treating the wall-clock value as
/// UTC since no timezone logic applies. Accepts a handful of common
/// formats rather than a single rigid one, since source tables vary in
/// whether seconds/fractional-seconds are present.
fn parse_naive_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive);
        }
    }
    // Fall back to full RFC3339 parsing for records that do carry an offset;
    // the offset is discarded and only the UTC instant is kept.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, from: &str, to: &str, amount: f64, ts: &str) -> TransferRecord {
        TransferRecord {
            transaction_id: id.to_string(),
            from_account: from.to_string(),
            to_account: to.to_string(),
            amount,
            timestamp: ts.to_string(),
        }
    }

    #[test]
    fn parses_valid_records() {
        let table = TransactionTable::from_records(vec![record(
            "T1",
            "A",
            "B",
            1000.0,
            "2025-01-01T10:00:00",
        )])
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.as_slice()[0].amount, 1000.0);
    }

    #[test]
    fn rejects_negative_amount() {
        let err = TransactionTable::from_records(vec![record(
            "T1",
            "A",
            "B",
            -5.0,
            "2025-01-01T10:00:00",
        )])
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRecord { .. }));
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let err = TransactionTable::from_records(vec![record(
            "T1", "A", "B", 100.0, "not-a-timestamp",
        )])
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRecord { .. }));
    }

    #[test]
    fn fails_whole_batch_on_first_bad_record() {
        let records = vec![
            record("T1", "A", "B", 100.0, "2025-01-01T10:00:00"),
            record("T2", "B", "C", -1.0, "2025-01-01T10:00:00"),
        ];
        let err = TransactionTable::from_records(records).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRecord { .. }));
    }

    #[test]
    fn empty_table_is_empty() {
        let table = TransactionTable::from_records(vec![]).unwrap();
        assert!(table.is_empty());
    }
}
