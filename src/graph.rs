//! The transfer multigraph the cycle and centrality detectors walk.
//!
//! Accounts are interned to dense indices and adjacency is stored as
//! sorted index arrays so the hot algorithmic passes — cycle
//! enumeration and Brandes' betweenness — never touch account strings.

use crate::error::AnalysisError;
use crate::transaction::{AccountId, Transaction};
use std::collections::HashMap;
use tracing::debug;

/// Aggregated edge between an ordered account pair.
#[derive(Debug, Clone)]
pub struct Edge {
    pub weight: f64,
    pub count: usize,
    pub transfers: Vec<Transaction>,
}

/// Directed weighted multigraph built once from a [`TransactionTable`](crate::transaction::TransactionTable).
pub struct TransferGraph {
    accounts: Vec<AccountId>,
    index_of: HashMap<AccountId, usize>,
    edges: HashMap<(usize, usize), Edge>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl TransferGraph {
    /// Build the graph from an ordered sequence of transfers. Single-pass
    /// and deterministic: transfers sharing a `(from, to)` pair land in
    /// the edge's transfer list in the same order they appear here.
    pub fn build<'a>(transfers: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut accounts = Vec::new();
        let mut index_of = HashMap::new();
        let mut edges: HashMap<(usize, usize), Edge> = HashMap::new();

        for transfer in transfers {
            let u = intern(&mut accounts, &mut index_of, &transfer.from);
            let v = intern(&mut accounts, &mut index_of, &transfer.to);

            let edge = edges.entry((u, v)).or_insert_with(|| Edge {
                weight: 0.0,
                count: 0,
                transfers: Vec::new(),
            });
            edge.weight += transfer.amount;
            edge.count += 1;
            edge.transfers.push(transfer.clone());
        }

        let n = accounts.len();
        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        for &(u, v) in edges.keys() {
            successors[u].push(v);
            predecessors[v].push(u);
        }
        for adj in successors.iter_mut().chain(predecessors.iter_mut()) {
            adj.sort_unstable();
            adj.dedup();
        }

        debug!(nodes = n, edges = edges.len(), "built transfer graph");

        Self {
            accounts,
            index_of,
            edges,
            successors,
            predecessors,
        }
    }

    pub fn node_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &AccountId> {
        self.accounts.iter()
    }

    pub fn account(&self, index: usize) -> &AccountId {
        &self.accounts[index]
    }

    pub fn index_of(&self, account: &str) -> Option<usize> {
        self.index_of.get(account).copied()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.edges.contains_key(&(u, v))
    }

    pub fn edge(&self, u: usize, v: usize) -> Result<&Edge, AnalysisError> {
        self.edges.get(&(u, v)).ok_or_else(|| AnalysisError::GraphInvariantViolation {
            from: self.accounts[u].clone(),
            to: self.accounts[v].clone(),
        })
    }

    /// Node indices this node has outgoing edges to, sorted and deduplicated.
    pub fn successors(&self, u: usize) -> &[usize] {
        &self.successors[u]
    }

    /// Node indices this node has incoming edges from, sorted and deduplicated.
    pub fn predecessors(&self, u: usize) -> &[usize] {
        &self.predecessors[u]
    }

    pub fn out_degree(&self, u: usize) -> usize {
        self.successors[u].len()
    }

    pub fn in_degree(&self, u: usize) -> usize {
        self.predecessors[u].len()
    }

    /// `E / (N*(N-1))`, or `0` for `N < 2`.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        self.edge_count() as f64 / (n * (n - 1)) as f64
    }
}

fn intern(accounts: &mut Vec<AccountId>, index_of: &mut HashMap<AccountId, usize>, account: &AccountId) -> usize {
    *index_of.entry(account.clone()).or_insert_with(|| {
        accounts.push(account.clone());
        accounts.len() - 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn aggregates_parallel_transfers_into_one_edge() {
        let transfers = vec![txn("T1", "A", "B", 100.0), txn("T2", "A", "B", 50.0)];
        let graph = TransferGraph::build(&transfers);
        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        let edge = graph.edge(a, b).unwrap();
        assert_eq!(edge.weight, 150.0);
        assert_eq!(edge.count, 2);
        assert_eq!(edge.transfers[0].id, "T1");
        assert_eq!(edge.transfers[1].id, "T2");
    }

    #[test]
    fn degree_counts_distinct_neighbors_not_transfer_counts() {
        let transfers = vec![txn("T1", "A", "B", 10.0), txn("T2", "A", "B", 10.0)];
        let graph = TransferGraph::build(&transfers);
        let a = graph.index_of("A").unwrap();
        assert_eq!(graph.out_degree(a), 1);
    }

    #[test]
    fn density_zero_below_two_nodes() {
        let graph = TransferGraph::build(&[]);
        assert_eq!(graph.density(), 0.0);
    }

    #[test]
    fn missing_edge_is_graph_invariant_violation() {
        let transfers = vec![txn("T1", "A", "B", 10.0)];
        let graph = TransferGraph::build(&transfers);
        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();
        assert!(graph.edge(b, a).is_err());
    }
}
