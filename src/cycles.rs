//! Closed transfer cycle detection (circular flows).
//!
//! Enumeration follows a minimum-start-node DFS restriction: every
//! simple cycle has a unique node of smallest index, so rooting a DFS
//! at each node and only extending through strictly-greater-index
//! nodes (closing back only to the root) visits every simple cycle
//! exactly once.

use crate::alert::{round_to, Alert, CycleAlert};
use crate::graph::TransferGraph;
use crate::transaction::Transaction;
use tracing::{debug, warn};

const MAX_VARIATION: f64 = 0.20;
const MIN_TOTAL_AMOUNT: f64 = 5000.0;
const MAX_TIME_SPAN_HOURS: f64 = 48.0;

/// Enumerates, filters, and scores suspicious closed transfer cycles.
pub struct CycleDetector;

impl CycleDetector {
    pub fn detect(graph: &TransferGraph) -> Vec<Alert> {
        let candidates = enumerate_cycles(graph);
        debug!(candidates = candidates.len(), "cycle enumeration complete");

        let mut alerts = Vec::new();
        for cycle in candidates {
            if let Some(alert) = evaluate_cycle(graph, &cycle) {
                alerts.push(Alert::Cycle(alert));
            }
        }
        debug!(survivors = alerts.len(), "cycle filtering complete");
        alerts
    }
}

/// Enumerate every simple directed cycle of length >= 2 (the length >= 3
/// filter is applied by the caller, since a self-loop or 2-cycle is
/// naturally excluded by the `path.len() >= 3` check below).
fn enumerate_cycles(graph: &TransferGraph) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut cycles = Vec::new();

    for start in 0..n {
        let mut path = vec![start];
        let mut on_path = vec![false; n];
        on_path[start] = true;
        dfs(graph, start, start, &mut path, &mut on_path, &mut cycles);
    }

    cycles
}

fn dfs(
    graph: &TransferGraph,
    start: usize,
    current: usize,
    path: &mut Vec<usize>,
    on_path: &mut [bool],
    cycles: &mut Vec<Vec<usize>>,
) {
    for &next in graph.successors(current) {
        if next == start {
            if path.len() >= 3 {
                cycles.push(path.clone());
            }
            continue;
        }
        if next > start && !on_path[next] {
            path.push(next);
            on_path[next] = true;
            dfs(graph, start, next, path, on_path, cycles);
            path.pop();
            on_path[next] = false;
        }
    }
}

fn evaluate_cycle(graph: &TransferGraph, cycle: &[usize]) -> Option<CycleAlert> {
    let n = cycle.len();

    // Filter 2 (defense in depth): every wrap-around pair must be an edge.
    let mut cycle_txns: Vec<&Transaction> = Vec::new();
    for i in 0..n {
        let u = cycle[i];
        let v = cycle[(i + 1) % n];
        match graph.edge(u, v) {
            Ok(edge) => cycle_txns.extend(edge.transfers.iter()),
            Err(_) => {
                warn!(
                    from = %graph.account(u),
                    to = %graph.account(v),
                    "graph invariant violation in enumerated cycle, skipping"
                );
                return None;
            }
        }
    }

    if cycle_txns.is_empty() {
        return None;
    }

    let amounts: Vec<f64> = cycle_txns.iter().map(|t| t.amount).collect();
    let avg = amounts.iter().sum::<f64>() / amounts.len() as f64;
    let max = amounts.iter().cloned().fold(f64::MIN, f64::max);
    let min = amounts.iter().cloned().fold(f64::MAX, f64::min);
    let variation = if avg > 0.0 { (max - min) / avg } else { 0.0 };

    if variation > MAX_VARIATION {
        return None;
    }

    let total_amount: f64 = amounts.iter().sum();
    if total_amount < MIN_TOTAL_AMOUNT {
        return None;
    }

    let min_ts = cycle_txns.iter().map(|t| t.timestamp).min()?;
    let max_ts = cycle_txns.iter().map(|t| t.timestamp).max()?;
    let time_span_hours = (max_ts - min_ts).num_seconds() as f64 / 3600.0;
    if time_span_hours > MAX_TIME_SPAN_HOURS {
        return None;
    }

    let mut score = 0u32;
    score += (n as u32 * 15).min(40);

    if variation < 0.05 {
        score += 30;
    } else if variation < 0.15 {
        score += 20;
    }

    if time_span_hours < 1.0 {
        score += 30;
    } else if time_span_hours < 12.0 {
        score += 20;
    } else if time_span_hours < 24.0 {
        score += 10;
    }

    if total_amount > 50_000.0 {
        score += 20;
    } else if total_amount > 20_000.0 {
        score += 10;
    }

    let risk_score = score.min(100) as u8;

    Some(CycleAlert {
        accounts: cycle.iter().map(|&i| graph.account(i).clone()).collect(),
        total_amount: round_to(total_amount, 2),
        avg_amount: round_to(avg, 2),
        time_span_hours: round_to(time_span_hours, 2),
        num_transactions: cycle_txns.len(),
        amount_variation_percent: round_to(variation * 100.0, 2),
        risk_score,
        transactions: cycle_txns.into_iter().cloned().collect(),
    })
}
