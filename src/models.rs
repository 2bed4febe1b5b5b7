use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// One bibliographic entry as returned by the search service.
///
/// The three `orcid_*` lists pair positionally with `authors`. A missing field and a JSON
/// `null` both land as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub bibcode: String,
    #[serde(rename = "author", default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub orcid_pub: Option<Vec<String>>,
    #[serde(default)]
    pub orcid_user: Option<Vec<String>>,
    #[serde(default)]
    pub orcid_other: Option<Vec<String>>,
}

/// A paper after reconciliation: one identifier (or the sentinel) per author slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledPaper {
    pub bibcode: String,
    pub authors: Vec<String>,
    pub author_ids: Vec<String>,
}

/// Reads a JSON array of paper records.
pub fn load_records(path: &Path) -> Result<Vec<PaperRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open records file: {:?}", path))?;
    let reader = BufReader::with_capacity(256 * 1024, file);

    let records: Vec<PaperRecord> = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse records JSON: {:?}", path))?;

    info!(records = records.len(), path = ?path, "Records loaded");
    Ok(records)
}
