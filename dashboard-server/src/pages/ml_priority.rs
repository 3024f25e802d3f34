//! ML priority page
//!
//! Scores the loaded companies, then reports the metric cards, the tier
//! and cluster distributions and the companies ranked by composite score.
//! When the batch is too small to fit, the same page comes back ranked by
//! raw total risk with `ml_skipped` set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use ecd_scoring::constants::DEFAULT_TOP_N;
use ecd_scoring::logic::scoring::rank_by;
use ecd_scoring::{
    score_batch, AugmentedRow, FeatureRow, ModelSummary, PriorityTier, ScoringConfig,
    ScoringError,
};

use super::{num, text};
use crate::models::CompanyRecord;

fn default_limit() -> i64 {
    1000
}

fn default_top() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MlPriorityRequest {
    /// Companies loaded from the warehouse
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 5000))]
    pub limit: i64,

    /// Size of the top priorities table
    #[serde(default = "default_top")]
    #[validate(range(min = 1, max = 500))]
    pub top: usize,
}

impl Default for MlPriorityRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            top: default_top(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MlMetrics {
    pub anomalies: usize,
    pub critical: usize,
    pub high: usize,
    pub clusters: usize,
}

/// One company in the priority tables
#[derive(Debug, Clone, Serialize)]
pub struct PriorityRow {
    pub cnpj: String,
    pub nm_razao_social: String,
    pub setor: String,
    pub cd_uf: String,
    pub score_ml_total: f64,
    pub prioridade_ml: String,
    pub cor_prioridade: String,
    pub score_risco_total: f64,
    pub ativo_milhoes: f64,
    pub receita_milhoes: f64,
    pub liquidez: f64,
    pub endividamento: f64,
    pub anomalia: bool,
    pub cluster: i32,
}

impl PriorityRow {
    fn new(company: &CompanyRecord, scored: &AugmentedRow) -> Self {
        Self {
            cnpj: company.cnpj.clone(),
            nm_razao_social: text(&company.nm_razao_social),
            setor: text(&company.setor),
            cd_uf: text(&company.cd_uf),
            score_ml_total: num(scored.composite_score),
            prioridade_ml: scored
                .priority_tier
                .map(|t| t.label().to_string())
                .unwrap_or_default(),
            cor_prioridade: scored
                .priority_tier
                .map(|t| t.color().to_string())
                .unwrap_or_default(),
            score_risco_total: num(company.score_risco_total),
            ativo_milhoes: num(company.ativo_milhoes),
            receita_milhoes: num(company.receita_milhoes),
            liquidez: num(company.liquidez),
            endividamento: num(company.endividamento),
            anomalia: scored.is_anomaly,
            cluster: scored.cluster_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MlPriorityPage {
    pub total_companies: usize,
    pub metrics: MlMetrics,
    pub tier_distribution: BTreeMap<PriorityTier, usize>,
    pub cluster_sizes: Vec<usize>,
    /// First `top` entries of `rows`
    pub top: Vec<PriorityRow>,
    /// Every loaded company, ranked
    pub rows: Vec<PriorityRow>,
    pub ml_skipped: bool,
    pub message: Option<String>,
    pub model: Option<ModelSummary>,
}

pub fn render(
    companies: &[CompanyRecord],
    request: &MlPriorityRequest,
    config: &ScoringConfig,
) -> Result<MlPriorityPage, ScoringError> {
    let batch: Vec<FeatureRow> = companies
        .iter()
        .enumerate()
        .map(|(position, company)| company.to_feature_row(position))
        .collect();

    let outcome = score_batch(&batch, config)?;
    let summary = outcome.summary();

    // Augmented rows come back in input order, one per company
    let mut ranked: Vec<(&CompanyRecord, &AugmentedRow)> =
        companies.iter().zip(outcome.rows()).collect();
    rank_by(&mut ranked, |(_, scored)| scored.composite_score);

    let rows: Vec<PriorityRow> = ranked
        .iter()
        .map(|(company, scored)| PriorityRow::new(company, scored))
        .collect();
    let top = rows.iter().take(request.top).cloned().collect();

    let tier_distribution = match summary {
        Some(summary) => summary.tier_counts.clone(),
        None => count_tiers(outcome.rows()),
    };
    let tier_count = |tier: PriorityTier| tier_distribution.get(&tier).copied().unwrap_or(0);

    let metrics = MlMetrics {
        anomalies: summary.map_or(0, |s| s.anomalies),
        critical: tier_count(PriorityTier::Critica),
        high: tier_count(PriorityTier::Alta),
        clusters: summary.map_or(0, |s| s.clusters_identified),
    };

    Ok(MlPriorityPage {
        total_companies: companies.len(),
        metrics,
        cluster_sizes: summary.map(|s| s.cluster_sizes.clone()).unwrap_or_default(),
        tier_distribution,
        top,
        rows,
        ml_skipped: outcome.is_skipped(),
        message: outcome.message(),
        model: summary.cloned(),
    })
}

fn count_tiers(rows: &[AugmentedRow]) -> BTreeMap<PriorityTier, usize> {
    let mut counts: BTreeMap<PriorityTier, usize> =
        PriorityTier::ALL.iter().map(|t| (*t, 0)).collect();

    for tier in rows.iter().filter_map(|r| r.priority_tier) {
        *counts.entry(tier).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companies(n: usize) -> Vec<CompanyRecord> {
        (0..n).map(CompanyRecord::sample).collect()
    }

    #[test]
    fn test_scored_page() {
        let companies = companies(40);
        let request = MlPriorityRequest {
            top: 10,
            ..Default::default()
        };

        let page = render(&companies, &request, &ScoringConfig::default()).unwrap();

        assert!(!page.ml_skipped);
        assert!(page.message.is_none());
        assert_eq!(page.total_companies, 40);
        assert_eq!(page.rows.len(), 40);
        assert_eq!(page.top.len(), 10);
        assert_eq!(page.metrics.clusters, 4);
        assert_eq!(page.cluster_sizes.iter().sum::<usize>(), 40);
        assert_eq!(page.metrics.anomalies, page.rows.iter().filter(|r| r.anomalia).count());
        assert_eq!(page.tier_distribution.values().sum::<usize>(), 40);
        assert_eq!(
            page.metrics.critical,
            page.rows.iter().filter(|r| r.prioridade_ml == "Crítica").count()
        );

        assert!(page
            .rows
            .windows(2)
            .all(|w| w[0].score_ml_total >= w[1].score_ml_total));
        assert!(page.rows.iter().all(|r| r.cluster >= 0));
    }

    #[test]
    fn test_anomaly_adds_bonus_to_displayed_score() {
        let page = render(&companies(30), &MlPriorityRequest::default(), &ScoringConfig::default())
            .unwrap();

        for row in &page.rows {
            let bonus = if row.anomalia { 5.0 } else { 0.0 };
            assert!((row.score_ml_total - row.score_risco_total - bonus).abs() < 1e-9);
        }
    }

    #[test]
    fn test_small_batch_falls_back_to_raw_ranking() {
        let companies = companies(6);
        let page = render(&companies, &MlPriorityRequest::default(), &ScoringConfig::default())
            .unwrap();

        assert!(page.ml_skipped);
        assert!(page.model.is_none());
        assert!(page.message.unwrap().contains("insufficient data"));
        assert_eq!(page.metrics.anomalies, 0);
        assert_eq!(page.metrics.clusters, 0);
        assert_eq!(page.rows.len(), 6);

        let mut expected: Vec<f64> = companies
            .iter()
            .map(|c| c.score_risco_total.unwrap())
            .collect();
        expected.sort_by(|a, b| b.total_cmp(a));
        let shown: Vec<f64> = page.rows.iter().map(|r| r.score_ml_total).collect();
        assert_eq!(shown, expected);
        assert!(page.rows.iter().all(|r| r.cluster == -1 && !r.anomalia));
    }

    #[test]
    fn test_missing_values_render_clean() {
        let mut companies = companies(20);
        companies[4].setor = None;
        companies[4].liquidez = None;
        companies[9].score_risco_total = None;

        let page = render(&companies, &MlPriorityRequest::default(), &ScoringConfig::default())
            .unwrap();
        assert_eq!(page.rows.len(), 20);

        let partial = page.rows.iter().find(|r| r.cnpj == companies[4].cnpj).unwrap();
        assert_eq!(partial.setor, "");
        assert_eq!(partial.liquidez, 0.0);
        assert_eq!(partial.cluster, -1);

        // No total risk means no composite: ranked last, shown as 0
        let last = page.rows.last().unwrap();
        assert_eq!(last.cnpj, companies[9].cnpj);
        assert_eq!(last.score_ml_total, 0.0);
        assert_eq!(last.prioridade_ml, "");
    }

    #[test]
    fn test_request_validation() {
        assert!(MlPriorityRequest::default().validate().is_ok());
        assert!(MlPriorityRequest { limit: 0, top: 50 }.validate().is_err());
        assert!(MlPriorityRequest { limit: 100, top: 501 }.validate().is_err());
    }
}
