//! Integration tests for the orcid-graph pipeline.
//!
//! These tests drive the public API from a JSON record dump through to query answers:
//!
//! - **Loading** -- JSON records with present, missing and `null` ORCID sources
//! - **Reconciliation** -- Priority merge and fallback outcomes across a batch
//! - **Graph Build** -- Node/edge sets, skipped papers, order independence
//! - **Centrality** -- Ranking over a graph with two components
//! - **Queries** -- Shortest paths, default endpoints, co-authors without identifiers
//!
//! # Sample Data
//!
//! `sample_json()` describes five papers:
//! - R1: Adams, Baker with X, Y (Y only via `orcid_user`)
//! - R2: Baker, Clark with Y, Z (Z only via `orcid_other`)
//! - R3: Davis alone, no identifier
//! - R4: Adams, Evans with X, none
//! - R5: Fox, Grant with P, Q, but mismatched source lengths (falls back to `orcid_pub`)

use orcid_graph::centrality::rank;
use orcid_graph::graph::build_graph;
use orcid_graph::models::{load_records, PaperRecord, ReconciledPaper};
use orcid_graph::query::{
    coauthors_without_identifier, resolve_endpoints, shortest_path, PathResult, QueryError,
};
use orcid_graph::reconcile::reconcile_all;
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;

const X: &str = "0000-0001-0000-0001";
const Y: &str = "0000-0001-0000-0002";
const Z: &str = "0000-0001-0000-0003";
const P: &str = "0000-0002-0000-0001";
const Q: &str = "0000-0002-0000-0002";

fn sample_json() -> String {
    format!(
        r#"[
        {{"bibcode": "2016ApJ...R1", "author": ["Adams", "Baker"],
          "orcid_pub": ["{X}", "-"], "orcid_user": ["-", "{Y}"], "orcid_other": ["-", "-"]}},
        {{"bibcode": "2016ApJ...R2", "author": ["Baker", "Clark"],
          "orcid_pub": ["-", "-"], "orcid_user": ["{Y}", "-"], "orcid_other": ["-", "{Z}"]}},
        {{"bibcode": "2016ApJ...R3", "author": ["Davis"],
          "orcid_pub": ["-"]}},
        {{"bibcode": "2016ApJ...R4", "author": ["Adams", "Evans"],
          "orcid_pub": ["{X}", "-"], "orcid_user": null}},
        {{"bibcode": "2016ApJ...R5", "author": ["Fox", "Grant"],
          "orcid_pub": ["{P}", "{Q}"], "orcid_user": ["-"], "orcid_other": ["-", "-", "-"]}}
    ]"#
    )
}

/// Helper: write the sample JSON to a temp file and return the handle.
fn sample_file() -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(sample_json().as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn load_sample() -> Vec<PaperRecord> {
    let tmp = sample_file();
    load_records(tmp.path()).unwrap()
}

fn reconciled_sample() -> Vec<ReconciledPaper> {
    reconcile_all(&load_sample()).0
}

fn edge_set(papers: &[ReconciledPaper]) -> BTreeSet<(String, String)> {
    let (graph, _) = build_graph(papers);
    graph
        .edges()
        .map(|(a, b)| {
            let (a, b) = (graph.node_id(a).to_string(), graph.node_id(b).to_string());
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Loading and reconciliation
// ---------------------------------------------------------------------------

#[test]
fn loads_all_records() {
    let records = load_sample();
    assert_eq!(records.len(), 5);
    assert!(records[2].orcid_user.is_none());
    assert!(records[3].orcid_user.is_none());
}

#[test]
fn reconciliation_merges_sources() {
    let papers = reconciled_sample();

    assert_eq!(papers[0].author_ids, vec![X, Y]);
    assert_eq!(papers[1].author_ids, vec![Y, Z]);
    assert_eq!(papers[2].author_ids, vec!["-"]);
    assert_eq!(papers[3].author_ids, vec![X, "-"]);
}

#[test]
fn reconciliation_falls_back_on_mismatch() {
    let (papers, stats) = reconcile_all(&load_sample());

    assert_eq!(papers[4].author_ids, vec![P, Q]);
    assert_eq!(stats.records, 5);
    assert_eq!(stats.reconciled, 4);
    assert_eq!(stats.length_mismatch, 1);
    assert_eq!(stats.malformed_ids, 0);
}

#[test]
fn reconciliation_preserves_bibcodes_and_authors() {
    let records = load_sample();
    let (papers, _) = reconcile_all(&records);

    for (record, paper) in records.iter().zip(&papers) {
        assert_eq!(record.bibcode, paper.bibcode);
        assert_eq!(record.authors, paper.authors);
    }
}

// ---------------------------------------------------------------------------
// Graph build
// ---------------------------------------------------------------------------

#[test]
fn graph_has_expected_nodes_and_edges() {
    let papers = reconciled_sample();
    let (graph, stats) = build_graph(&papers);

    let nodes: BTreeSet<_> = graph.nodes().iter().map(String::as_str).collect();
    assert_eq!(nodes, BTreeSet::from([X, Y, Z, P, Q]));
    assert_eq!(graph.edge_count(), 3);
    assert!(graph.has_edge(X, Y));
    assert!(graph.has_edge(Y, Z));
    assert!(graph.has_edge(P, Q));
    assert!(!graph.contains("-"));

    // R3 and R4 have fewer than two identified authors
    assert_eq!(stats.papers_skipped, 2);
    assert_eq!(stats.papers_contributing, 3);
}

#[test]
fn graph_independent_of_record_order() {
    let papers = reconciled_sample();
    let mut rotated = papers.clone();
    rotated.rotate_left(2);
    let mut reversed = papers.clone();
    reversed.reverse();

    assert_eq!(edge_set(&papers), edge_set(&rotated));
    assert_eq!(edge_set(&papers), edge_set(&reversed));
}

// ---------------------------------------------------------------------------
// Centrality
// ---------------------------------------------------------------------------

#[test]
fn centrality_ranks_bridge_first() {
    let (graph, _) = build_graph(&reconciled_sample());
    let ranking = rank(&graph);

    assert_eq!(ranking.len(), 5);
    assert_eq!(ranking.entries()[0].0, Y);
    for (_, score) in ranking.entries() {
        assert!(*score > 0.0 && *score <= 1.0);
    }

    // X and Z are symmetric ends of the chain; their relative order is not significant
    let next: BTreeSet<_> = ranking.entries()[1..3]
        .iter()
        .map(|(id, _)| id.as_str())
        .collect();
    assert_eq!(next, BTreeSet::from([X, Z]));
    assert_eq!(ranking.score(X), ranking.score(Z));

    // The P-Q pair reaches only a quarter of the graph
    assert!(ranking.score(P).unwrap() < ranking.score(X).unwrap());
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[test]
fn path_between_chain_ends() {
    let (graph, _) = build_graph(&reconciled_sample());
    let result = shortest_path(&graph, X, Z);

    assert_eq!(
        result,
        PathResult::Connected(vec![X.to_string(), Y.to_string(), Z.to_string()])
    );
    assert_eq!(result.degrees(), Some(2));
}

#[test]
fn path_across_components_is_not_connected() {
    let (graph, _) = build_graph(&reconciled_sample());
    assert_eq!(shortest_path(&graph, X, Q), PathResult::NotConnected);
}

#[test]
fn path_defaults_to_top_ranked() {
    let (graph, _) = build_graph(&reconciled_sample());
    let ranking = rank(&graph);

    let (source, target) = resolve_endpoints(None, None, &ranking).unwrap();
    assert_eq!(source, Y);

    let result = shortest_path(&graph, &source, &target);
    assert_eq!(result.degrees(), Some(1));
}

#[test]
fn coauthors_without_identifier_for_x() {
    let papers = reconciled_sample();
    assert_eq!(
        coauthors_without_identifier(&papers, Some(X)).unwrap(),
        vec!["Evans".to_string()]
    );
}

#[test]
fn coauthors_without_identifier_needs_node() {
    let papers = reconciled_sample();
    assert_eq!(
        coauthors_without_identifier(&papers, None),
        Err(QueryError::MissingNode)
    );
}

#[test]
fn coauthors_for_unlisted_identifier_is_empty() {
    let papers = reconciled_sample();
    assert!(coauthors_without_identifier(&papers, Some("0000-0009-9999-9999"))
        .unwrap()
        .is_empty());
}
