//! Scoring Configuration
//!
//! Recognized options for a scoring call. Validated before every fit.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CLUSTER_COUNT, DEFAULT_CONTAMINATION, DEFAULT_ESTIMATORS, DEFAULT_MIN_ROWS,
    DEFAULT_RANDOM_SEED,
};
use super::scoring::ScoringError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Expected anomaly rate, in (0, 0.5)
    pub contamination: f64,

    /// Number of k-means clusters
    pub cluster_count: usize,

    /// Seed for both the isolation forest and k-means
    pub random_seed: u64,

    /// Minimum complete-case rows required to fit
    pub min_rows: usize,

    /// Isolation forest ensemble size
    pub n_estimators: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            random_seed: DEFAULT_RANDOM_SEED,
            min_rows: DEFAULT_MIN_ROWS,
            n_estimators: DEFAULT_ESTIMATORS,
        }
    }
}

impl ScoringConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            random_seed: seed,
            ..Default::default()
        }
    }

    /// Rows needed before either model can be fit
    pub fn required_rows(&self) -> usize {
        self.min_rows.max(self.cluster_count)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(self.contamination > 0.0 && self.contamination < 0.5) {
            return Err(ScoringError::InvalidConfig(format!(
                "contamination must be in (0, 0.5), got {}",
                self.contamination
            )));
        }
        if self.cluster_count == 0 {
            return Err(ScoringError::InvalidConfig("cluster_count must be positive".into()));
        }
        if self.n_estimators == 0 {
            return Err(ScoringError::InvalidConfig("n_estimators must be positive".into()));
        }
        if self.min_rows == 0 {
            return Err(ScoringError::InvalidConfig("min_rows must be positive".into()));
        }
        Ok(())
    }
}
