//! Risk-Scoring Engine
//!
//! Pure batch transform: standardize → isolation forest → k-means →
//! composite score → tier. Either the whole batch is scored or nothing is.

use crate::logic::config::ScoringConfig;
use crate::logic::features::{extract_complete_cases, FeatureRow};
use crate::logic::model::{IsolationForest, IsolationParams, KMeans, KMeansParams, StandardScaler};
use crate::constants::{IFOREST_MAX_SAMPLES, KMEANS_MAX_ITER, KMEANS_N_INIT, KMEANS_TOLERANCE};
use super::augment::{augment, ScoringOutcome};
use super::summary::ModelSummary;
use super::types::ScoredRow;
use super::ScoringError;

impl From<&ScoringConfig> for IsolationParams {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            n_estimators: config.n_estimators,
            max_samples: IFOREST_MAX_SAMPLES,
            contamination: config.contamination,
            seed: config.random_seed,
        }
    }
}

impl From<&ScoringConfig> for KMeansParams {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            n_clusters: config.cluster_count,
            n_init: KMEANS_N_INIT,
            max_iter: KMEANS_MAX_ITER,
            tolerance: KMEANS_TOLERANCE,
            seed: config.random_seed,
        }
    }
}

/// Fit both models on the complete rows of `batch` and score them.
///
/// Rows with a missing required feature are left out of the result; join
/// the output back to the input by `row_id`.
pub fn fit_and_score(
    batch: &[FeatureRow],
    config: &ScoringConfig,
) -> Result<Vec<ScoredRow>, ScoringError> {
    config.validate()?;

    let cases = extract_complete_cases(batch)?;
    let required = config.required_rows();

    if cases.len() < required {
        log::warn!(
            "Skipping ML scoring: {} complete rows of {} ({} required)",
            cases.len(),
            batch.len(),
            required
        );
        return Err(ScoringError::InsufficientData {
            required,
            available: cases.len(),
        });
    }

    let (_, scaled) = StandardScaler::fit_transform(&cases.matrix);

    let forest = IsolationForest::fit(&scaled, &IsolationParams::from(config));
    let anomalies = forest.predict(&scaled);

    let clusters = KMeans::fit(&scaled, &KMeansParams::from(config));

    let rows: Vec<ScoredRow> = cases
        .row_ids
        .into_iter()
        .zip(anomalies)
        .zip(clusters.labels)
        .zip(cases.total_risk)
        .map(|(((row_id, is_anomaly), cluster_id), total_risk)| {
            ScoredRow::new(row_id, is_anomaly, cluster_id, total_risk)
        })
        .collect();

    log::info!(
        "Scored {} rows ({} dropped for missing values): {} anomalies, {} clusters, seed {}",
        rows.len(),
        cases.dropped.len(),
        rows.iter().filter(|r| r.is_anomaly).count(),
        config.cluster_count,
        config.random_seed
    );

    Ok(rows)
}

// ============================================================================
// ENGINE HANDLE
// ============================================================================

/// Configured engine. Holds no fitted state between calls.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn fit_and_score(&self, batch: &[FeatureRow]) -> Result<Vec<ScoredRow>, ScoringError> {
        fit_and_score(batch, &self.config)
    }

    /// Score and re-join onto the whole batch, falling back on small batches
    pub fn score_batch(&self, batch: &[FeatureRow]) -> Result<ScoringOutcome, ScoringError> {
        score_batch(batch, &self.config)
    }
}

/// `fit_and_score` plus realignment onto every input row.
///
/// Too few complete rows is not an error here: the outcome is `Skipped`
/// and every row carries neutral defaults. Schema and config errors
/// still propagate.
pub fn score_batch(
    batch: &[FeatureRow],
    config: &ScoringConfig,
) -> Result<ScoringOutcome, ScoringError> {
    match fit_and_score(batch, config) {
        Ok(scored) => {
            let rows = augment(batch, scored);
            let summary = ModelSummary::from_rows(&rows, config);
            log::debug!("Model summary: {}", summary.to_log_entry());

            Ok(ScoringOutcome::Scored { rows, summary })
        }
        Err(reason) if reason.is_recoverable() => Ok(ScoringOutcome::Skipped {
            rows: augment(batch, Vec::new()),
            reason,
        }),
        Err(e) => Err(e),
    }
}
