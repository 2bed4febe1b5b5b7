//! Closeness centrality ranking.
//!
//! Uses the Wasserman-Faust form, which stays meaningful on disconnected graphs:
//!
//! ```text
//! C(v) = (r - 1) / T(v) * (r - 1) / (n - 1)
//! ```
//!
//! where `r` is the number of nodes reachable from `v` (including `v`), `T(v)` is the sum of
//! shortest-path distances to them and `n` is the node count. A node in a small component is
//! penalized in proportion to how little of the graph it can reach.

use crate::graph::CoauthorGraph;
use rayon::prelude::*;
use std::collections::VecDeque;
use tracing::info;

/// Identifiers with their closeness score, highest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentralityRanking {
    entries: Vec<(String, f64)>,
}

impl CentralityRanking {
    pub fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, n: usize) -> &[(String, f64)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn score(&self, id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == id)
            .map(|(_, score)| *score)
    }
}

/// BFS hop counts from `source`; `None` for unreachable nodes.
pub(crate) fn bfs_distances(graph: &CoauthorGraph, source: u32) -> Vec<Option<u32>> {
    let mut dist = vec![None; graph.node_count()];
    dist[source as usize] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = dist[v as usize].unwrap_or(0) + 1;
        for w in graph.neighbors(v) {
            if dist[w as usize].is_none() {
                dist[w as usize] = Some(next);
                queue.push_back(w);
            }
        }
    }

    dist
}

#[allow(clippy::cast_precision_loss)]
pub fn closeness(graph: &CoauthorGraph, node: u32) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }

    let (reachable, total) = bfs_distances(graph, node)
        .into_iter()
        .flatten()
        .fold((0u64, 0u64), |(count, sum), d| (count + 1, sum + u64::from(d)));

    if total == 0 {
        return 0.0;
    }

    let others = (reachable - 1) as f64;
    (others / total as f64) * (others / (n - 1) as f64)
}

/// Scores every node and sorts descending. Equal scores keep node insertion order.
pub fn rank(graph: &CoauthorGraph) -> CentralityRanking {
    let scores: Vec<f64> = (0..graph.node_count() as u32)
        .into_par_iter()
        .map(|idx| closeness(graph, idx))
        .collect();

    let mut entries: Vec<(String, f64)> = graph.nodes().iter().cloned().zip(scores).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));

    if let Some((id, score)) = entries.first() {
        info!(nodes = entries.len(), top = %id, score = *score, "Centrality ranked");
    }

    CentralityRanking { entries }
}
