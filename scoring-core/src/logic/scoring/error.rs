//! Scoring errors
//!
//! `InsufficientData` is the only recoverable failure: callers fall back to a
//! non-ML ranking. Everything else is a caller bug.

use thiserror::Error;

use crate::logic::features::RowId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("insufficient data to train model: {available} complete rows, {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),
}

impl ScoringError {
    /// True when the caller should skip ML and rank by raw score instead
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScoringError::InsufficientData { .. })
    }
}

/// Input table does not match the feature layout
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("row {row_id} has no column '{column}'")]
    MissingColumn { row_id: RowId, column: String },

    #[error("row {row_id} has a non-finite value in '{column}'")]
    NonFinite { row_id: RowId, column: String },

    #[error("row id {0} appears more than once in the batch")]
    DuplicateRowId(RowId),

    #[error("empty row id at position {0}")]
    EmptyRowId(usize),
}
