use crate::centrality::CentralityRanking;
use crate::config::{DataPaths, SNAPSHOT_VERSION};
use crate::graph::CoauthorGraph;
use crate::models::ReconciledPaper;
use anyhow::{bail, Context, Result};
use bincode::Options;
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

#[derive(Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: u32,
    pub kind: String,
    pub count: usize,
}

#[derive(Deserialize)]
struct PapersSnapshotDe {
    metadata: SnapshotMetadata,
    papers: Vec<ReconciledPaper>,
}

/// Borrows the papers to avoid cloning every author list during serialization.
#[derive(Serialize)]
struct PapersSnapshotSer<'a> {
    metadata: SnapshotMetadata,
    papers: &'a [ReconciledPaper],
}

#[derive(Deserialize)]
struct GraphSnapshotDe {
    metadata: SnapshotMetadata,
    nodes: Vec<String>,
    edges: Vec<(u32, u32)>,
}

#[derive(Serialize)]
struct GraphSnapshotSer<'a> {
    metadata: SnapshotMetadata,
    nodes: &'a [String],
    edges: Vec<(u32, u32)>,
}

const PAPERS_KIND: &str = "papers";
const GRAPH_KIND: &str = "graph";

/// Serializes to a temp file next to `path` and renames it into place.
fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let tmp_path = path.with_extension("bin.tmp");
    let file = File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp snapshot file: {:?}", tmp_path))?;
    let writer = BufWriter::new(file);

    bincode::DefaultOptions::new()
        .serialize_into(writer, value)
        .with_context(|| format!("Failed to serialize snapshot: {:?}", path))?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to rename temp snapshot file to: {:?}", path))?;
    Ok(())
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!("Snapshot file does not exist: {:?}", path);
    }

    let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot file: {:?}", path))?;
    let reader = BufReader::with_capacity(256 * 1024, file);

    let options = bincode::options().with_limit(file_size.saturating_add(1024));
    options
        .deserialize_from(reader)
        .with_context(|| format!("Failed to deserialize snapshot: {:?}", path))
}

fn check_metadata(metadata: &SnapshotMetadata, kind: &str, path: &Path) -> Result<()> {
    if metadata.version != SNAPSHOT_VERSION {
        bail!(
            "Snapshot {:?} has version {}, expected {}",
            path,
            metadata.version,
            SNAPSHOT_VERSION
        );
    }
    if metadata.kind != kind {
        bail!(
            "Snapshot {:?} holds {}, expected {}",
            path,
            metadata.kind,
            kind
        );
    }
    Ok(())
}

pub fn save_papers(paths: &DataPaths, papers: &[ReconciledPaper]) -> Result<()> {
    let path = paths.papers();
    let snapshot = PapersSnapshotSer {
        metadata: SnapshotMetadata {
            version: SNAPSHOT_VERSION,
            kind: PAPERS_KIND.to_string(),
            count: papers.len(),
        },
        papers,
    };
    write_snapshot(&path, &snapshot)?;

    info!(papers = papers.len(), path = ?path, "Reconciled papers saved");
    Ok(())
}

pub fn load_papers(paths: &DataPaths) -> Result<Vec<ReconciledPaper>> {
    let path = paths.papers();
    let snapshot: PapersSnapshotDe = read_snapshot(&path)?;
    check_metadata(&snapshot.metadata, PAPERS_KIND, &path)?;

    info!(papers = snapshot.papers.len(), "Reconciled papers loaded");
    Ok(snapshot.papers)
}

pub fn save_graph(paths: &DataPaths, graph: &CoauthorGraph) -> Result<()> {
    let path = paths.graph();
    let snapshot = GraphSnapshotSer {
        metadata: SnapshotMetadata {
            version: SNAPSHOT_VERSION,
            kind: GRAPH_KIND.to_string(),
            count: graph.node_count(),
        },
        nodes: graph.nodes(),
        edges: graph.edges().collect(),
    };
    write_snapshot(&path, &snapshot)?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        path = ?path,
        "Graph saved"
    );
    Ok(())
}

pub fn load_graph(paths: &DataPaths) -> Result<CoauthorGraph> {
    let path = paths.graph();
    let snapshot: GraphSnapshotDe = read_snapshot(&path)?;
    check_metadata(&snapshot.metadata, GRAPH_KIND, &path)?;

    let graph = CoauthorGraph::from_parts(snapshot.nodes, &snapshot.edges)
        .with_context(|| format!("Graph snapshot is inconsistent: {:?}", path))?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph loaded"
    );
    Ok(graph)
}

/// Writes `identifier<TAB>score` rows, highest score first, without a header.
pub fn save_ranking(paths: &DataPaths, ranking: &CentralityRanking) -> Result<()> {
    let path = paths.centrality();
    let file = File::create(&path)
        .with_context(|| format!("Failed to create centrality file: {:?}", path))?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    for (id, score) in ranking.entries() {
        writer.write_record([id.as_str(), score.to_string().as_str()])?;
    }
    writer.flush()?;

    info!(nodes = ranking.len(), path = ?path, "Centrality ranking saved");
    Ok(())
}

pub fn load_ranking(paths: &DataPaths) -> Result<CentralityRanking> {
    let path = paths.centrality();
    let file = File::open(&path)
        .with_context(|| format!("Failed to open centrality file: {:?}", path))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(BufReader::new(file));

    let mut entries = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Malformed row {} in {:?}", line + 1, path))?;
        let id = record
            .get(0)
            .with_context(|| format!("Missing identifier on row {}", line + 1))?;
        let score: f64 = record
            .get(1)
            .with_context(|| format!("Missing score on row {}", line + 1))?
            .parse()
            .with_context(|| format!("Invalid score on row {}", line + 1))?;
        entries.push((id.to_string(), score));
    }

    Ok(CentralityRanking::from_entries(entries))
}

/// Returns `Ok(None)` when no ranking has been written yet.
pub fn try_load_ranking(paths: &DataPaths) -> Result<Option<CentralityRanking>> {
    if !paths.centrality().exists() {
        return Ok(None);
    }
    load_ranking(paths).map(Some)
}
