//! Import counters and the end-of-run summary

use serde::Serialize;
use std::fmt;

use crate::transform::SkipReason;

/// Rows actually inserted while writing one id
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InsertCounts {
    pub types: u64,
    pub reprocessing: u64,
    pub blueprints: u64,
    pub blueprint_materials: u64,
}

impl InsertCounts {
    pub fn add(&mut self, other: InsertCounts) {
        self.types += other.types;
        self.reprocessing += other.reprocessing;
        self.blueprints += other.blueprints;
        self.blueprint_materials += other.blueprint_materials;
    }

    pub fn total(&self) -> u64 {
        self.types + self.reprocessing + self.blueprints + self.blueprint_materials
    }
}

/// Counters for one import run.
///
/// Insert counters only move when a new row was written, so a repeated run
/// over unchanged data reports zero everywhere except the skip counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    #[serde(flatten)]
    pub inserted: InsertCounts,
    /// Relevant ids without type metadata
    pub skipped: u64,
    /// Ids whose type row was withheld because the type is unpublished
    pub unpublished: u64,
    /// Ids whose writes were rolled back after an error
    pub failed: u64,
    /// Relevant ids visited
    pub processed: u64,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_inserts(&mut self, counts: InsertCounts) {
        self.inserted.add(counts);
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoMetadata => self.skipped += 1,
            SkipReason::Unpublished => self.unpublished += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    /// Fold the counters of a committed batch into the run totals
    pub fn merge(&mut self, batch: &ImportReport) {
        self.inserted.add(batch.inserted);
        self.skipped += batch.skipped;
        self.unpublished += batch.unpublished;
        self.failed += batch.failed;
        self.processed += batch.processed;
    }

    pub fn total_inserted(&self) -> u64 {
        self.inserted.total()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import complete!")?;
        writeln!(f, "  Types imported: {}", self.inserted.types)?;
        writeln!(f, "  Reprocessing entries: {}", self.inserted.reprocessing)?;
        writeln!(f, "  Blueprints imported: {}", self.inserted.blueprints)?;
        writeln!(f, "  Blueprint materials: {}", self.inserted.blueprint_materials)?;
        write!(f, "  Types skipped (no info): {}", self.skipped)?;
        if self.unpublished > 0 {
            write!(f, "\n  Types skipped (unpublished): {}", self.unpublished)?;
        }
        if self.failed > 0 {
            write!(f, "\n  Types failed: {}", self.failed)?;
        }
        Ok(())
    }
}
