//! Undirected co-authorship graph keyed by ORCID iD.
//!
//! Nodes are interned to dense `u32` indices in first-seen order; adjacency is kept sorted so
//! traversals are deterministic for a given node order.

use crate::config::PROGRESS_INTERVAL;
use crate::models::ReconciledPaper;
use crate::reconcile::is_identifier;
use crate::stats::BuildStats;
use indicatif::ProgressBar;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CoauthorGraph {
    ids: Vec<String>,
    index: FxHashMap<String, u32>,
    adjacency: Vec<BTreeSet<u32>>,
    edge_count: usize,
}

impl CoauthorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_index(&self, id: &str) -> Option<u32> {
        self.index.get(id).copied()
    }

    /// # Panics
    ///
    /// Panics if `idx` is not below [`node_count`](Self::node_count).
    pub fn node_id(&self, idx: u32) -> &str {
        &self.ids[idx as usize]
    }

    /// Identifiers in insertion order
    pub fn nodes(&self) -> &[String] {
        &self.ids
    }

    /// # Panics
    ///
    /// Panics if `idx` is not below [`node_count`](Self::node_count).
    pub fn neighbors(&self, idx: u32) -> impl Iterator<Item = u32> + '_ {
        self.adjacency[idx as usize].iter().copied()
    }

    /// # Panics
    ///
    /// Panics if `idx` is not below [`node_count`](Self::node_count).
    pub fn degree(&self, idx: u32) -> usize {
        self.adjacency[idx as usize].len()
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(a), Some(b)) => self.adjacency[a as usize].contains(&b),
            _ => false,
        }
    }

    /// Each undirected edge once, as `(lower, higher)` node indices.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, adj)| {
            let a = a as u32;
            adj.range(a + 1..).map(move |&b| (a, b))
        })
    }

    fn intern(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len() as u32;
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        self.adjacency.push(BTreeSet::new());
        idx
    }

    /// Adds the undirected edge `a`-`b`, creating either endpoint as needed.
    ///
    /// Returns false when the edge already existed. Self-loops and non-identifier endpoints
    /// are rejected without touching the graph.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        if a == b || !is_identifier(a) || !is_identifier(b) {
            return false;
        }
        let a = self.intern(a);
        let b = self.intern(b);
        let inserted = self.adjacency[a as usize].insert(b);
        if inserted {
            self.adjacency[b as usize].insert(a);
            self.edge_count += 1;
        }
        inserted
    }

    /// Rebuilds a graph from its node list and index-pair edge list.
    pub fn from_parts(ids: Vec<String>, edges: &[(u32, u32)]) -> anyhow::Result<Self> {
        let n = ids.len() as u32;
        let mut graph = Self::new();
        for id in &ids {
            graph.intern(id);
        }
        if graph.node_count() != ids.len() {
            anyhow::bail!("Duplicate node identifiers in graph snapshot");
        }
        for &(a, b) in edges {
            if a >= n || b >= n {
                anyhow::bail!("Edge ({}, {}) references a node outside 0..{}", a, b, n);
            }
            let (a, b) = (ids[a as usize].as_str(), ids[b as usize].as_str());
            graph.add_edge(a, b);
        }
        Ok(graph)
    }
}

/// Folds papers into a [`CoauthorGraph`] one at a time.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: CoauthorGraph,
    stats: BuildStats,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links every pair of distinct identified authors on one paper.
    ///
    /// Papers with fewer than two distinct identifiers leave the graph untouched, so every
    /// node in the result has at least one neighbor.
    pub fn add_paper(&mut self, author_ids: &[String]) {
        let mut seen = FxHashSet::default();
        let members: Vec<&str> = author_ids
            .iter()
            .map(String::as_str)
            .filter(|id| is_identifier(id) && seen.insert(*id))
            .collect();

        let mut added = 0u64;
        let mut repeated = 0u64;
        if members.len() >= 2 {
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    if self.graph.add_edge(a, b) {
                        added += 1;
                    } else {
                        repeated += 1;
                    }
                }
            }
        }
        self.stats.record_paper(added, repeated);
    }

    pub fn finish(self) -> (CoauthorGraph, BuildStats) {
        (self.graph, self.stats)
    }
}

pub fn build_graph(papers: &[ReconciledPaper]) -> (CoauthorGraph, BuildStats) {
    let mut builder = GraphBuilder::new();
    let pb = ProgressBar::new(papers.len() as u64);

    for (i, paper) in papers.iter().enumerate() {
        builder.add_paper(&paper.author_ids);
        if (i as u64 + 1) % PROGRESS_INTERVAL == 0 {
            pb.set_position(i as u64 + 1);
        }
    }

    pb.finish_and_clear();

    let (graph, stats) = builder.finish();
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        papers_contributing = stats.papers_contributing,
        papers_skipped = stats.papers_skipped,
        "Graph built"
    );
    (graph, stats)
}
