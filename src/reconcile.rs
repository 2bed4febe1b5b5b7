//! Merges the three per-author ORCID sources of a record into one identifier per slot.
//!
//! Sources are consulted in priority order `orcid_pub`, `orcid_user`, `orcid_other`. The
//! first source whose slot is not the sentinel wins; otherwise the slot keeps the sentinel.
//! When the sources cannot be trusted to line up, the record falls back to a verbatim copy of
//! `orcid_pub` and the outcome says why.

use crate::config::{PROGRESS_INTERVAL, SENTINEL};
use crate::models::{PaperRecord, ReconciledPaper};
use crate::stats::ReconcileStats;
use indicatif::ProgressBar;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static ORCID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// All three sources present with differing lengths
    LengthMismatch,
    /// `orcid_pub` itself is absent
    MissingPrimary,
    /// A lower-priority source was consulted past its end
    SlotOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Reconciled(Vec<String>),
    FallbackCopied {
        ids: Vec<String>,
        reason: FallbackReason,
    },
}

impl ReconcileOutcome {
    pub fn ids(&self) -> &[String] {
        match self {
            ReconcileOutcome::Reconciled(ids) => ids,
            ReconcileOutcome::FallbackCopied { ids, .. } => ids,
        }
    }

    pub fn into_ids(self) -> Vec<String> {
        match self {
            ReconcileOutcome::Reconciled(ids) => ids,
            ReconcileOutcome::FallbackCopied { ids, .. } => ids,
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            ReconcileOutcome::Reconciled(_) => None,
            ReconcileOutcome::FallbackCopied { reason, .. } => Some(*reason),
        }
    }
}

/// True for a slot value that can become a graph node (not the sentinel, not empty).
pub fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value != SENTINEL
}

/// True for any slot value other than the sentinel. Empty strings still win a slot.
pub fn is_supplied(value: &str) -> bool {
    value != SENTINEL
}

/// True when the value has the `0000-0000-0000-000X` shape of an ORCID iD.
pub fn looks_like_orcid(value: &str) -> bool {
    ORCID_REGEX.is_match(value)
}

pub fn reconcile(record: &PaperRecord) -> ReconcileOutcome {
    let Some(primary) = record.orcid_pub.as_ref() else {
        return ReconcileOutcome::FallbackCopied {
            ids: Vec::new(),
            reason: FallbackReason::MissingPrimary,
        };
    };

    if let (Some(user), Some(other)) = (&record.orcid_user, &record.orcid_other) {
        if primary.len() != user.len() || primary.len() != other.len() {
            return fallback(primary, FallbackReason::LengthMismatch);
        }
    }

    let secondary = [record.orcid_user.as_deref(), record.orcid_other.as_deref()];
    let mut ids = Vec::with_capacity(primary.len());

    'slots: for (slot, value) in primary.iter().enumerate() {
        if is_supplied(value) {
            ids.push(value.clone());
            continue;
        }
        // Later sources are only indexed when every earlier one holds the sentinel.
        for source in secondary.iter().flatten() {
            match source.get(slot) {
                Some(candidate) if is_supplied(candidate) => {
                    ids.push(candidate.clone());
                    continue 'slots;
                }
                Some(_) => {}
                None => return fallback(primary, FallbackReason::SlotOutOfRange),
            }
        }
        ids.push(SENTINEL.to_string());
    }

    ReconcileOutcome::Reconciled(ids)
}

fn fallback(primary: &[String], reason: FallbackReason) -> ReconcileOutcome {
    ReconcileOutcome::FallbackCopied {
        ids: primary.to_vec(),
        reason,
    }
}

/// Reconciles every record. Never drops a record; anomalies are counted, not raised.
pub fn reconcile_all(records: &[PaperRecord]) -> (Vec<ReconciledPaper>, ReconcileStats) {
    let mut stats = ReconcileStats::new();
    let mut papers = Vec::with_capacity(records.len());
    let pb = ProgressBar::new(records.len() as u64);

    for (i, record) in records.iter().enumerate() {
        let outcome = reconcile(record);
        match outcome.fallback_reason() {
            None => stats.inc_reconciled(),
            Some(reason) => {
                debug!(bibcode = %record.bibcode, ?reason, "Falling back to orcid_pub");
                stats.inc_fallback(reason);
            }
        }

        let author_ids = outcome.into_ids();
        for id in &author_ids {
            if is_identifier(id) {
                stats.resolved_slots += 1;
                if !looks_like_orcid(id) {
                    stats.malformed_ids += 1;
                }
            } else {
                stats.unresolved_slots += 1;
            }
        }

        papers.push(ReconciledPaper {
            bibcode: record.bibcode.clone(),
            authors: record.authors.clone(),
            author_ids,
        });

        if (i as u64 + 1) % PROGRESS_INTERVAL == 0 {
            pb.set_position(i as u64 + 1);
        }
    }

    pb.finish_and_clear();

    info!(
        records = stats.records,
        reconciled = stats.reconciled,
        fallbacks = stats.fallbacks(),
        resolved_slots = stats.resolved_slots,
        malformed_ids = stats.malformed_ids,
        "Reconciliation complete"
    );

    (papers, stats)
}
