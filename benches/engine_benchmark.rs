use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use transfer_fraud_engine::{AnalysisConfig, FraudAnalysisEngine, Transaction, TransactionTable, TransferGraph};

/// A ring of `n` accounts each forwarding to the next, plus one
/// high-fan-in/fan-out hub — enough structure to exercise cycle
/// enumeration, structuring's per-account grouping, and Brandes'
/// betweenness all at once.
fn synthetic_batch(n: usize) -> TransactionTable {
    let now = Utc::now();
    let mut transfers = Vec::with_capacity(n * 2);

    for i in 0..n {
        let from = format!("ACC-{i}");
        let to = format!("ACC-{}", (i + 1) % n);
        transfers.push(Transaction {
            id: format!("RING-{i}"),
            from,
            to,
            amount: 10_000.0 + (i as f64),
            timestamp: now + Duration::minutes(i as i64),
        });
    }

    for i in 0..n {
        transfers.push(Transaction {
            id: format!("HUB-IN-{i}"),
            from: format!("ACC-{i}"),
            to: "ACC-HUB".to_string(),
            amount: 1_000.0,
            timestamp: now + Duration::minutes(i as i64),
        });
        transfers.push(Transaction {
            id: format!("HUB-OUT-{i}"),
            from: "ACC-HUB".to_string(),
            to: format!("ACC-{}", (i + 1) % n),
            amount: 1_000.0,
            timestamp: now + Duration::minutes(i as i64),
        });
    }

    TransactionTable::new(transfers)
}

fn bench_graph_build(c: &mut Criterion) {
    let table = synthetic_batch(200);
    c.bench_function("graph_build_200_accounts", |b| {
        b.iter(|| TransferGraph::build(black_box(table.as_slice())))
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    let table = synthetic_batch(100);
    let engine = FraudAnalysisEngine::with_config(AnalysisConfig::default());
    c.bench_function("full_analysis_100_accounts", |b| {
        b.iter(|| engine.analyze(black_box(&table)))
    });
}

criterion_group!(benches, bench_graph_build, bench_full_analysis);
criterion_main!(benches);
