//! Realignment of engine output onto the input table
//!
//! Joins by `row_id`. Positions are never used: the engine drops rows and
//! may return them in any order.

use std::collections::HashMap;

use serde::Serialize;

use crate::logic::features::{FeatureRow, RowId};
use super::summary::ModelSummary;
use super::types::{AugmentedRow, ScoredRow};
use super::ScoringError;

/// One augmented row per input row, in input order.
/// Rows without a scored counterpart get neutral defaults.
pub fn augment(batch: &[FeatureRow], scored: Vec<ScoredRow>) -> Vec<AugmentedRow> {
    let mut by_id: HashMap<RowId, ScoredRow> = scored
        .into_iter()
        .map(|row| (row.row_id.clone(), row))
        .collect();

    batch
        .iter()
        .map(|row| match by_id.remove(&row.row_id) {
            Some(scored) => AugmentedRow::from(scored),
            None => AugmentedRow::unscored(row),
        })
        .collect()
}

/// Result of scoring a batch for display
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoringOutcome {
    Scored {
        rows: Vec<AugmentedRow>,
        summary: ModelSummary,
    },
    /// ML was skipped; rows carry neutral defaults
    Skipped {
        #[serde(serialize_with = "serialize_reason")]
        reason: ScoringError,
        rows: Vec<AugmentedRow>,
    },
}

fn serialize_reason<S: serde::Serializer>(reason: &ScoringError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(reason)
}

impl ScoringOutcome {
    pub fn rows(&self) -> &[AugmentedRow] {
        match self {
            ScoringOutcome::Scored { rows, .. } | ScoringOutcome::Skipped { rows, .. } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<AugmentedRow> {
        match self {
            ScoringOutcome::Scored { rows, .. } | ScoringOutcome::Skipped { rows, .. } => rows,
        }
    }

    pub fn summary(&self) -> Option<&ModelSummary> {
        match self {
            ScoringOutcome::Scored { summary, .. } => Some(summary),
            ScoringOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ScoringOutcome::Skipped { .. })
    }

    /// Informational note for the end user when ML was skipped
    pub fn message(&self) -> Option<String> {
        match self {
            ScoringOutcome::Scored { .. } => None,
            ScoringOutcome::Skipped { reason, .. } => Some(reason.to_string()),
        }
    }
}
