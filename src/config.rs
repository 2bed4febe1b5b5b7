use std::path::{Path, PathBuf};

/// Slot value meaning "no identifier at this source for this author"
pub const SENTINEL: &str = "-";

/// Progress update interval (tick every N records)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Bump when the layout of any bincode snapshot changes
pub const SNAPSHOT_VERSION: u32 = 1;

pub const PAPERS_FILE: &str = "papers.bin";
pub const GRAPH_FILE: &str = "graph.bin";
pub const GEXF_FILE: &str = "graph.gexf";
pub const CENTRALITY_FILE: &str = "centrality.tsv";

/// Number of ranked identifiers printed after a centrality run
pub const DEFAULT_TOP_N: usize = 10;

/// Locations of every pipeline artifact under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn papers(&self) -> PathBuf {
        self.root.join(PAPERS_FILE)
    }

    pub fn graph(&self) -> PathBuf {
        self.root.join(GRAPH_FILE)
    }

    pub fn gexf(&self) -> PathBuf {
        self.root.join(GEXF_FILE)
    }

    pub fn centrality(&self) -> PathBuf {
        self.root.join(CENTRALITY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_under_root() {
        let paths = DataPaths::new("/data/run");
        assert_eq!(paths.papers(), PathBuf::from("/data/run/papers.bin"));
        assert_eq!(paths.graph(), PathBuf::from("/data/run/graph.bin"));
        assert_eq!(paths.gexf(), PathBuf::from("/data/run/graph.gexf"));
        assert_eq!(paths.centrality(), PathBuf::from("/data/run/centrality.tsv"));
    }
}
