//! Feature Rows - Core input structure for scoring
//!
//! A `FeatureRow` is one company-period observation keyed by an opaque
//! `RowId`. `extract_complete_cases` turns a batch into the dense matrix the
//! models consume, dropping rows with missing values (never imputing).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT, TOTAL_RISK_FEATURE, TOTAL_RISK_INDEX};
use crate::logic::scoring::SchemaError;

// ============================================================================
// ROW IDENTIFIER
// ============================================================================

/// Opaque row identifier, unique within a batch.
/// Output is re-joined to input by this value, never by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<usize> for RowId {
    fn from(position: usize) -> Self {
        Self(position.to_string())
    }
}

// ============================================================================
// FEATURE ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub row_id: RowId,
    /// Named indicators. `None` (or NaN) marks a missing value.
    pub features: BTreeMap<String, Option<f64>>,
}

impl FeatureRow {
    pub fn new(row_id: impl Into<RowId>) -> Self {
        Self {
            row_id: row_id.into(),
            features: BTreeMap::new(),
        }
    }

    /// Build a row from values in FEATURE_LAYOUT order
    pub fn from_values(row_id: impl Into<RowId>, values: [Option<f64>; FEATURE_COUNT]) -> Self {
        let features = FEATURE_LAYOUT
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        Self {
            row_id: row_id.into(),
            features,
        }
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, Some(value));
        self
    }

    pub fn with_missing(mut self, name: &str) -> Self {
        self.set(name, None);
        self
    }

    pub fn set(&mut self, name: &str, value: Option<f64>) {
        self.features.insert(name.to_string(), value);
    }

    /// Present and not NaN
    pub fn get(&self, name: &str) -> Option<f64> {
        self.features
            .get(name)
            .copied()
            .flatten()
            .filter(|v| !v.is_nan())
    }

    /// Raw total risk score, if present
    pub fn total_risk(&self) -> Option<f64> {
        self.get(TOTAL_RISK_FEATURE).filter(|v| v.is_finite())
    }

    pub fn is_complete(&self) -> bool {
        FEATURE_LAYOUT
            .iter()
            .all(|name| self.get(name).map_or(false, f64::is_finite))
    }
}

// ============================================================================
// COMPLETE-CASE EXTRACTION
// ============================================================================

/// Rows that survived the missing-value filter, as a dense matrix
#[derive(Debug, Clone)]
pub struct CompleteCases {
    /// Ids of matrix rows, in input order
    pub row_ids: Vec<RowId>,
    /// n × FEATURE_COUNT, raw (non-standardized) values
    pub matrix: Array2<f64>,
    /// Raw total risk per matrix row
    pub total_risk: Vec<f64>,
    /// Ids of rows excluded for missing values
    pub dropped: Vec<RowId>,
}

impl CompleteCases {
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }
}

/// Validate the batch schema and keep complete rows only.
///
/// Every row must carry every layout column (extra columns are ignored).
/// `None`/NaN values drop the row; infinite values are a schema error.
pub fn extract_complete_cases(batch: &[FeatureRow]) -> Result<CompleteCases, SchemaError> {
    let mut seen = HashSet::with_capacity(batch.len());
    let mut row_ids = Vec::with_capacity(batch.len());
    let mut values: Vec<[f64; FEATURE_COUNT]> = Vec::with_capacity(batch.len());
    let mut dropped = Vec::new();

    for (position, row) in batch.iter().enumerate() {
        if row.row_id.as_str().is_empty() {
            return Err(SchemaError::EmptyRowId(position));
        }
        if !seen.insert(&row.row_id) {
            return Err(SchemaError::DuplicateRowId(row.row_id.clone()));
        }

        let mut dense = [0.0f64; FEATURE_COUNT];
        let mut complete = true;

        for (idx, name) in FEATURE_LAYOUT.iter().enumerate() {
            let value = row.features.get(*name).ok_or_else(|| SchemaError::MissingColumn {
                row_id: row.row_id.clone(),
                column: name.to_string(),
            })?;

            match value {
                Some(v) if v.is_infinite() => {
                    return Err(SchemaError::NonFinite {
                        row_id: row.row_id.clone(),
                        column: name.to_string(),
                    });
                }
                Some(v) if !v.is_nan() => dense[idx] = *v,
                _ => complete = false,
            }
        }

        if complete {
            row_ids.push(row.row_id.clone());
            values.push(dense);
        } else {
            dropped.push(row.row_id.clone());
        }
    }

    let matrix = Array2::from_shape_fn((values.len(), FEATURE_COUNT), |(i, j)| values[i][j]);
    let total_risk = values.iter().map(|v| v[TOTAL_RISK_INDEX]).collect();

    Ok(CompleteCases {
        row_ids,
        matrix,
        total_risk,
        dropped,
    })
}
