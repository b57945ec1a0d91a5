use crate::error::RowError;
use crate::model::Identity;
use serde::Serialize;
use std::collections::HashSet;

pub enum RowOutcome {
    Inserted,
    Duplicate,
    Rejected,
}

impl RowOutcome {
    pub fn record(self, stats: &mut ImportStats) {
        match self {
            RowOutcome::Inserted => stats.inserted += 1,
            RowOutcome::Duplicate => stats.duplicates += 1,
            RowOutcome::Rejected => stats.rejected += 1,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub inserted: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

/// Collects the new records of one extraction or import call.
///
/// Identities already in the destination store, and identities accepted
/// earlier in the same batch, are reported as duplicates.
pub struct IngestBatch {
    seen: HashSet<Identity>,
    accepted: Vec<Identity>,
    stats: ImportStats,
}

impl IngestBatch {
    pub fn new(existing: HashSet<Identity>) -> Self {
        Self {
            seen: existing,
            accepted: Vec::new(),
            stats: ImportStats::default(),
        }
    }

    /// Offers one normalized row. Returns the identity if it was accepted.
    pub fn offer(&mut self, row: Result<Identity, RowError>) -> Option<&Identity> {
        let identity = match row {
            Ok(identity) => identity,
            Err(_) => {
                RowOutcome::Rejected.record(&mut self.stats);
                return None;
            }
        };

        if self.seen.contains(&identity) {
            log_duplicate(&identity);
            RowOutcome::Duplicate.record(&mut self.stats);
            return None;
        }

        self.seen.insert(identity.clone());
        self.accepted.push(identity);
        RowOutcome::Inserted.record(&mut self.stats);
        self.accepted.last()
    }

    pub fn into_parts(self) -> (Vec<Identity>, ImportStats) {
        (self.accepted, self.stats)
    }
}

pub fn log_duplicate(identity: &Identity) {
    tracing::info!(
        text = %identity.text,
        source = ?identity.source,
        "skipping duplicate highlight"
    );
}

pub fn log_rejected_row(origin: &str, row: usize, reason: &RowError) {
    tracing::warn!("skipping {} row {}: {}", origin, row, reason);
}
