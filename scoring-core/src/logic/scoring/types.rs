//! Row types
//!
//! `ScoredRow` covers rows that entered the fit; `AugmentedRow` covers every
//! input row, with neutral defaults where the models did not run.

use serde::{Deserialize, Serialize};

use crate::constants::{ANOMALY_BONUS, UNSCORED_CLUSTER};
use crate::logic::features::{FeatureRow, RowId};
use super::tier::PriorityTier;

// ============================================================================
// SCORED ROW
// ============================================================================

/// Engine output for one row that entered the fitted batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub row_id: RowId,
    pub is_anomaly: bool,
    /// In [0, cluster_count). Arbitrary per call.
    pub cluster_id: usize,
    /// ANOMALY_BONUS or 0
    pub anomaly_score_component: f64,
    /// anomaly_score_component + raw total risk
    pub composite_score: f64,
    pub priority_tier: PriorityTier,
}

impl ScoredRow {
    pub fn new(row_id: RowId, is_anomaly: bool, cluster_id: usize, total_risk: f64) -> Self {
        let anomaly_score_component = if is_anomaly { ANOMALY_BONUS } else { 0.0 };
        let composite_score = anomaly_score_component + total_risk;

        Self {
            row_id,
            is_anomaly,
            cluster_id,
            anomaly_score_component,
            composite_score,
            priority_tier: PriorityTier::from_score(composite_score),
        }
    }
}

// ============================================================================
// AUGMENTED ROW
// ============================================================================

/// Score columns for one input row, scored or not.
/// The augmented table has the input's row count and id set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedRow {
    pub row_id: RowId,
    /// False when the row was dropped before fitting or ML was skipped
    pub scored: bool,
    pub is_anomaly: bool,
    pub anomaly_score_component: f64,
    /// UNSCORED_CLUSTER (-1) for unscored rows
    pub cluster_id: i32,
    /// Raw total risk for unscored rows; `None` if that is missing too
    pub composite_score: Option<f64>,
    pub priority_tier: Option<PriorityTier>,
}

impl AugmentedRow {
    /// Neutral defaults for a row the models never saw
    pub fn unscored(row: &FeatureRow) -> Self {
        let composite_score = row.total_risk();

        Self {
            row_id: row.row_id.clone(),
            scored: false,
            is_anomaly: false,
            anomaly_score_component: 0.0,
            cluster_id: UNSCORED_CLUSTER,
            composite_score,
            priority_tier: PriorityTier::classify(composite_score),
        }
    }
}

impl From<ScoredRow> for AugmentedRow {
    fn from(row: ScoredRow) -> Self {
        Self {
            row_id: row.row_id,
            scored: true,
            is_anomaly: row.is_anomaly,
            anomaly_score_component: row.anomaly_score_component,
            cluster_id: row.cluster_id as i32,
            composite_score: Some(row.composite_score),
            priority_tier: Some(row.priority_tier),
        }
    }
}
