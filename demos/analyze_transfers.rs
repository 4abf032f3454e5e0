//! Fraud analysis engine walkthrough
//!
//! Demonstrates cycle, structuring, and bridge-account centrality
//! detection over a small synthetic batch of transfers.

use chrono::{Duration, Utc};
use transfer_fraud_engine::{
    Alert, AnalysisConfig, AnalysisReport, FraudAnalysisEngine, Transaction, TransactionTable,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Transfer Fraud Analysis Engine ===\n");

    let now = Utc::now();

    println!("1. Closed Transfer Cycle");
    let mut transfers = vec![
        Transaction {
            id: "T1".to_string(),
            from: "ACC-A".to_string(),
            to: "ACC-B".to_string(),
            amount: 10_000.0,
            timestamp: now,
        },
        Transaction {
            id: "T2".to_string(),
            from: "ACC-B".to_string(),
            to: "ACC-C".to_string(),
            amount: 10_050.0,
            timestamp: now + Duration::minutes(30),
        },
        Transaction {
            id: "T3".to_string(),
            from: "ACC-C".to_string(),
            to: "ACC-A".to_string(),
            amount: 9_950.0,
            timestamp: now + Duration::minutes(60),
        },
    ];
    println!("   {} transfers forming A -> B -> C -> A\n", transfers.len());

    println!("2. Deposit Structuring Burst");
    for i in 0..5 {
        transfers.push(Transaction {
            id: format!("S{i}"),
            from: "ACC-SMURF".to_string(),
            to: format!("ACC-MULE-{i}"),
            amount: 2_000.0 + (i as f64 * 40.0),
            timestamp: now + Duration::hours(i as i64),
        });
    }
    println!("   5 similar-sized transfers from ACC-SMURF within a 48h window\n");

    println!("3. Bridge Account");
    for (src, dst) in [("ACC-X", "ACC-HUB"), ("ACC-Y", "ACC-HUB")] {
        transfers.push(Transaction {
            id: format!("B-{src}"),
            from: src.to_string(),
            to: dst.to_string(),
            amount: 5_000.0,
            timestamp: now,
        });
    }
    for (src, dst) in [("ACC-HUB", "ACC-Z"), ("ACC-HUB", "ACC-W")] {
        transfers.push(Transaction {
            id: format!("B-{dst}"),
            from: src.to_string(),
            to: dst.to_string(),
            amount: 5_000.0,
            timestamp: now,
        });
    }
    println!("   ACC-HUB routes transfers between X, Y, Z, W\n");

    let table = TransactionTable::new(transfers);

    println!("4. Running Analysis (default configuration)");
    let engine = FraudAnalysisEngine::new();
    let report = engine.analyze(&table);

    println!("   Nodes: {}", report.graph_stats.nodes);
    println!("   Edges: {}", report.graph_stats.edges);
    println!("   Density: {:.4}", report.graph_stats.density);
    println!("   Cycles detected: {}", report.summary.cycles_detected);
    println!(
        "   Structuring detected: {}",
        report.summary.structuring_detected
    );
    println!(
        "   High-risk accounts (bridge/centrality detections): {}",
        report.summary.high_risk_accounts
    );
    println!();

    println!("5. Ranked Alerts");
    for alert in &report.alerts {
        match alert {
            Alert::Cycle(c) => println!(
                "   [CYCLE score={}] {} accounts, total ${:.2}, {} transactions",
                c.risk_score,
                c.accounts.len(),
                c.total_amount,
                c.num_transactions
            ),
            Alert::Structuring(s) => println!(
                "   [STRUCTURING score={}] {} over {} transfers in {:.2}h",
                s.risk_score, s.account, s.num_transactions, s.time_window_hours
            ),
            Alert::HighCentrality(h) => println!(
                "   [CENTRALITY score={}] {} betweenness={:.4} balanced_bridge={}",
                h.risk_score, h.account, h.betweenness, h.is_balanced_bridge
            ),
        }
    }
    println!();

    if !report.detector_errors.is_empty() {
        println!("6. Detector Errors");
        for err in &report.detector_errors {
            println!("   ! {err}");
        }
        println!();
    }

    println!("7. Custom Configuration (stricter structuring window)");
    let custom_config = AnalysisConfig {
        structuring_threshold_count: 3,
        ..AnalysisConfig::default()
    };
    let custom_engine = FraudAnalysisEngine::with_config(custom_config);
    let custom_report = custom_engine.analyze(&table);
    println!(
        "   Structuring detected with threshold_count=3: {}",
        custom_report.summary.structuring_detected
    );
    println!();

    println!("8. Report as JSON (for the HTTP surface this engine feeds)");
    let json = serde_json::to_string_pretty(&report).expect("report is always serializable");
    let round_tripped: AnalysisReport =
        serde_json::from_str(&json).expect("engine output always round-trips");
    println!("   {} bytes, {} alerts round-tripped", json.len(), round_tripped.total_alerts);
}
