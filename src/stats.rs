use crate::reconcile::FallbackReason;
use serde::{Deserialize, Serialize};

/// Counters collected while reconciling a batch of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub records: u64,
    pub reconciled: u64,
    pub length_mismatch: u64,
    pub missing_primary: u64,
    pub slot_out_of_range: u64,
    pub resolved_slots: u64,
    pub unresolved_slots: u64,
    pub malformed_ids: u64,
}

impl ReconcileStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_reconciled(&mut self) {
        self.records += 1;
        self.reconciled += 1;
    }

    pub fn inc_fallback(&mut self, reason: FallbackReason) {
        self.records += 1;
        match reason {
            FallbackReason::LengthMismatch => self.length_mismatch += 1,
            FallbackReason::MissingPrimary => self.missing_primary += 1,
            FallbackReason::SlotOutOfRange => self.slot_out_of_range += 1,
        }
    }

    pub fn fallbacks(&self) -> u64 {
        self.length_mismatch + self.missing_primary + self.slot_out_of_range
    }
}

/// Counters collected while folding papers into the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub papers_seen: u64,
    pub papers_contributing: u64,
    pub papers_skipped: u64,
    pub edges_added: u64,
    pub edges_repeated: u64,
}

impl BuildStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_paper(&mut self, added: u64, repeated: u64) {
        self.papers_seen += 1;
        if added + repeated == 0 {
            self.papers_skipped += 1;
        } else {
            self.papers_contributing += 1;
        }
        self.edges_added += added;
        self.edges_repeated += repeated;
    }
}
