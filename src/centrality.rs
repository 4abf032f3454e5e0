//! Bridge-account centrality detection via Brandes' betweenness algorithm.
//!
//! Edges are treated as unweighted and directed for the purposes of
//! shortest-path counting: the suspicion signal is structural position,
//! not transfer volume, so weighting by amount would bias betweenness
//! toward large single transfers rather than accounts that genuinely
//! sit between many others.

use crate::alert::{round_to, Alert, HighCentralityAlert};
use crate::graph::TransferGraph;
use tracing::debug;

const MIN_BETWEENNESS: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct CentralityConfig {
    pub top_n: usize,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

pub struct CentralityDetector;

impl CentralityDetector {
    pub fn detect(graph: &TransferGraph, config: &CentralityConfig) -> Vec<Alert> {
        let betweenness = brandes_betweenness(graph);

        let mut ranked: Vec<(usize, f64)> = betweenness
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score >= MIN_BETWEENNESS)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(config.top_n);

        debug!(candidates = ranked.len(), "centrality ranking complete");

        ranked
            .into_iter()
            .map(|(node, betweenness)| build_alert(graph, node, betweenness))
            .map(Alert::HighCentrality)
            .collect()
    }
}

/// Brandes' algorithm for unweighted directed betweenness centrality.
/// Each node contributes a single-source BFS shortest-path DAG followed
/// by back-propagation of dependency scores; the normalization divides
/// by `(n-1)(n-2)` for `n >= 3` so scores are comparable across graphs
/// of different sizes, and is zero for `n < 3` since no node can sit
/// strictly between two others.
fn brandes_betweenness(graph: &TransferGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut betweenness = vec![0.0; n];
    if n < 3 {
        return betweenness;
    }

    for s in 0..n {
        let mut stack = Vec::new();
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];
        sigma[s] = 1.0;
        dist[s] = 0;

        let mut queue = std::collections::VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in graph.successors(v) {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    let norm = ((n - 1) * (n - 2)) as f64;
    for score in betweenness.iter_mut() {
        *score /= norm;
    }
    betweenness
}

fn build_alert(graph: &TransferGraph, node: usize, betweenness: f64) -> HighCentralityAlert {
    let in_degree = graph.in_degree(node);
    let out_degree = graph.out_degree(node);

    let total_in_amount: f64 = graph
        .predecessors(node)
        .iter()
        .filter_map(|&p| graph.edge(p, node).ok())
        .map(|edge| edge.weight)
        .sum();
    let total_out_amount: f64 = graph
        .successors(node)
        .iter()
        .filter_map(|&s| graph.edge(node, s).ok())
        .map(|edge| edge.weight)
        .sum();

    let larger = total_in_amount.max(total_out_amount);
    let balance_ratio = if larger > 0.0 {
        total_in_amount.min(total_out_amount) / larger
    } else {
        0.0
    };
    let is_balanced_bridge = balance_ratio > 0.8;

    let mut score = 0u32;
    score += ((betweenness * 500.0).floor() as u32).min(40);

    let degree_sum = in_degree + out_degree;
    if degree_sum > 20 {
        score += 30;
    } else if degree_sum > 10 {
        score += 20;
    }

    if is_balanced_bridge {
        score += 25;
    }

    let total_volume = total_in_amount + total_out_amount;
    if total_volume > 100_000.0 {
        score += 20;
    } else if total_volume > 50_000.0 {
        score += 10;
    }

    let risk_score = score.min(100) as u8;

    HighCentralityAlert {
        account: graph.account(node).clone(),
        betweenness: round_to(betweenness, 4),
        in_degree,
        out_degree,
        total_in_amount: round_to(total_in_amount, 2),
        total_out_amount: round_to(total_out_amount, 2),
        is_balanced_bridge,
        risk_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;
    use chrono::Utc;

    fn txn(id: &str, from: &str, to: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn betweenness_zero_below_three_nodes() {
        let transfers = vec![txn("T1", "A", "B", 10.0)];
        let graph = TransferGraph::build(&transfers);
        let scores = brandes_betweenness(&graph);
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn bridge_node_has_positive_betweenness() {
        // A,B,C,D,E all route through M: A->M->B, C->M->D, etc.
        let transfers = vec![
            txn("T1", "A", "M", 100.0),
            txn("T2", "M", "B", 100.0),
            txn("T3", "C", "M", 100.0),
            txn("T4", "M", "D", 100.0),
        ];
        let graph = TransferGraph::build(&transfers);
        let scores = brandes_betweenness(&graph);
        let m = graph.index_of("M").unwrap();
        assert!(scores[m] > 0.0);
        for other in ["A", "B", "C", "D"] {
            let idx = graph.index_of(other).unwrap();
            assert_eq!(scores[idx], 0.0);
        }
    }

    #[test]
    fn balanced_bridge_flagged_when_in_out_volumes_match() {
        let transfers = vec![
            txn("T1", "A", "M", 1000.0),
            txn("T2", "B", "M", 1000.0),
            txn("T3", "M", "C", 1000.0),
            txn("T4", "M", "D", 1000.0),
        ];
        let graph = TransferGraph::build(&transfers);
        let alerts = CentralityDetector::detect(&graph, &CentralityConfig::default());
        let bridge = alerts
            .iter()
            .find(|a| matches!(a, Alert::HighCentrality(h) if h.account == "M"));
        assert!(bridge.is_some());
        if let Some(Alert::HighCentrality(h)) = bridge {
            assert!(h.is_balanced_bridge);
        }
    }

    #[test]
    fn top_n_truncates_ranking() {
        let mut transfers = Vec::new();
        for i in 0..6 {
            let hub = format!("H{i}");
            transfers.push(txn(&format!("IN{i}"), "SRC", &hub, 10.0));
            transfers.push(txn(&format!("OUT{i}"), &hub, "DST", 10.0));
        }
        let graph = TransferGraph::build(&transfers);
        let config = CentralityConfig { top_n: 2 };
        let alerts = CentralityDetector::detect(&graph, &config);
        assert!(alerts.len() <= 2);
    }
}
