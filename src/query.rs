use crate::centrality::CentralityRanking;
use crate::graph::CoauthorGraph;
use crate::models::ReconciledPaper;
use crate::config::SENTINEL;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter an ORCID ID.")]
    MissingNode,

    #[error("Centrality ranking has {available} node(s); {needed} needed to pick default endpoints")]
    RankingTooShort { needed: usize, available: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    Connected(Vec<String>),
    NotConnected,
}

impl PathResult {
    /// Edge count of the path, `None` when not connected.
    pub fn degrees(&self) -> Option<usize> {
        match self {
            PathResult::Connected(path) => Some(path.len().saturating_sub(1)),
            PathResult::NotConnected => None,
        }
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathResult::Connected(path) => {
                writeln!(f, "The shortest path is: {}", path.join(", "))?;
                write!(
                    f,
                    "The two ORCID IDs are connected by {} degree(s).",
                    path.len().saturating_sub(1)
                )
            }
            PathResult::NotConnected => write!(f, "These two ORCID IDs are not connected."),
        }
    }
}

/// Fills omitted endpoints with the first and second ranked identifiers.
pub fn resolve_endpoints(
    source: Option<&str>,
    target: Option<&str>,
    ranking: &CentralityRanking,
) -> Result<(String, String), QueryError> {
    let ranked = |pos: usize| -> Result<String, QueryError> {
        ranking
            .entries()
            .get(pos)
            .map(|(id, _)| id.clone())
            .ok_or(QueryError::RankingTooShort {
                needed: pos + 1,
                available: ranking.len(),
            })
    };

    let source = match source {
        Some(id) => id.to_string(),
        None => ranked(0)?,
    };
    let target = match target {
        Some(id) => id.to_string(),
        None => ranked(1)?,
    };
    Ok((source, target))
}

/// Unweighted shortest path by BFS. Unknown endpoints count as not connected.
pub fn shortest_path(graph: &CoauthorGraph, source: &str, target: &str) -> PathResult {
    let (Some(src), Some(dst)) = (graph.node_index(source), graph.node_index(target)) else {
        warn!(from = source, to = target, "Path endpoint not in graph");
        return PathResult::NotConnected;
    };

    let mut parent: Vec<Option<u32>> = vec![None; graph.node_count()];
    let mut visited = vec![false; graph.node_count()];
    visited[src as usize] = true;

    let mut queue = VecDeque::new();
    queue.push_back(src);

    while let Some(v) = queue.pop_front() {
        if v == dst {
            break;
        }
        for w in graph.neighbors(v) {
            if !visited[w as usize] {
                visited[w as usize] = true;
                parent[w as usize] = Some(v);
                queue.push_back(w);
            }
        }
    }

    if !visited[dst as usize] {
        debug!(from = source, to = target, "No path between endpoints");
        return PathResult::NotConnected;
    }

    let mut path = vec![graph.node_id(dst).to_string()];
    let mut current = dst;
    while let Some(prev) = parent[current as usize] {
        path.push(graph.node_id(prev).to_string());
        current = prev;
    }
    path.reverse();

    PathResult::Connected(path)
}

/// Names of `node`'s co-authors whose slot carries no identifier, sorted and deduplicated.
pub fn coauthors_without_identifier(
    papers: &[ReconciledPaper],
    node: Option<&str>,
) -> Result<Vec<String>, QueryError> {
    let node = node.filter(|n| !n.is_empty()).ok_or(QueryError::MissingNode)?;

    let mut names = BTreeSet::new();
    for paper in papers {
        if !paper.author_ids.iter().any(|id| id == node) {
            continue;
        }
        for (slot, id) in paper.author_ids.iter().enumerate() {
            if id != SENTINEL {
                continue;
            }
            match paper.authors.get(slot) {
                Some(name) => {
                    names.insert(name.clone());
                }
                None => debug!(bibcode = %paper.bibcode, slot, "Identifier slot has no author name"),
            }
        }
    }

    Ok(names.into_iter().collect())
}
