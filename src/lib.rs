//! orcid-graph: ORCID co-authorship network analysis
//!
//! This crate turns bibliographic records into a co-authorship graph keyed by ORCID iD and
//! answers questions about it:
//!
//! 1. **Reconciliation** -- Merge the `orcid_pub`, `orcid_user` and `orcid_other` lists of
//!    each record into one identifier per author slot, falling back to a verbatim copy of
//!    `orcid_pub` when the sources do not line up
//! 2. **Graph Build** -- Link every pair of identified co-authors on a paper; papers with
//!    fewer than two identified authors add nothing, so no node is isolated
//! 3. **Centrality** -- Rank every identifier by closeness centrality (Wasserman-Faust
//!    variant, so disconnected components are handled)
//! 4. **Queries** -- Shortest path and degrees of separation between two identifiers, and
//!    the co-authors of an identifier who never supplied one
//!
//! # Key Modules
//!
//! - [`reconcile`] -- Per-slot identifier merge with tagged fallback outcomes
//! - [`graph`] -- Interned undirected graph and the incremental builder
//! - [`centrality`] -- Closeness scores and descending ranking
//! - [`query`] -- BFS shortest path and missing-identifier co-author lookup
//! - [`models`] -- Record types and JSON input loading
//! - [`store`] -- Versioned bincode snapshots and the TSV ranking
//! - [`gexf`] -- GEXF export for Gephi
//! - [`stats`] -- Reconciliation and build counters
//! - [`config`] -- Constants and data-directory layout
//!
//! # Example Usage
//!
//! ```bash
//! orcid-graph run -i astro_orcid_records.json -d data/
//! orcid-graph path -d data/ --from 0000-0002-1825-0097
//! orcid-graph coauthors -d data/ --orcid 0000-0002-1825-0097
//! ```

pub mod centrality;
pub mod config;
pub mod gexf;
pub mod graph;
pub mod models;
pub mod query;
pub mod reconcile;
pub mod stats;
pub mod store;
