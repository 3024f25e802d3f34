//! Model summary for the dashboard metric cards

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::config::ScoringConfig;
use crate::logic::features::layout::{layout_hash, FEATURE_VERSION};
use super::tier::PriorityTier;
use super::types::AugmentedRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Rows that entered the fitted batch
    pub scored_rows: usize,
    /// Rows excluded for missing values
    pub dropped_rows: usize,
    pub anomalies: usize,
    /// Over the whole augmented table, unscored rows included
    pub tier_counts: BTreeMap<PriorityTier, usize>,
    /// Members per cluster label, index = label
    pub cluster_sizes: Vec<usize>,
    pub clusters_identified: usize,
    pub random_seed: u64,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub fitted_at: DateTime<Utc>,
}

impl ModelSummary {
    pub fn from_rows(rows: &[AugmentedRow], config: &ScoringConfig) -> Self {
        let mut tier_counts: BTreeMap<PriorityTier, usize> =
            PriorityTier::ALL.iter().map(|t| (*t, 0)).collect();
        let mut cluster_sizes = vec![0usize; config.cluster_count];
        let mut scored_rows = 0;
        let mut anomalies = 0;

        for row in rows {
            if let Some(tier) = row.priority_tier {
                *tier_counts.entry(tier).or_insert(0) += 1;
            }
            if !row.scored {
                continue;
            }

            scored_rows += 1;
            if row.is_anomaly {
                anomalies += 1;
            }
            if let Some(size) = usize::try_from(row.cluster_id)
                .ok()
                .and_then(|c| cluster_sizes.get_mut(c))
            {
                *size += 1;
            }
        }

        Self {
            scored_rows,
            dropped_rows: rows.len() - scored_rows,
            anomalies,
            tier_counts,
            clusters_identified: cluster_sizes.iter().filter(|s| **s > 0).count(),
            cluster_sizes,
            random_seed: config.random_seed,
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            fitted_at: Utc::now(),
        }
    }

    pub fn tier_count(&self, tier: PriorityTier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    /// Convert to JSON for structured logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "scored_rows": self.scored_rows,
            "dropped_rows": self.dropped_rows,
            "anomalies": self.anomalies,
            "critical": self.tier_count(PriorityTier::Critica),
            "high": self.tier_count(PriorityTier::Alta),
            "cluster_sizes": self.cluster_sizes,
            "layout_hash": format!("{:08x}", self.layout_hash),
        })
    }
}
