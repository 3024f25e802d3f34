//! High-risk companies page
//!
//! Filters the loaded companies by minimum total risk score and state,
//! then reports the summary cards and the listing by inspection priority.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{num, text};
use crate::models::CompanyRecord;

fn default_min_score() -> f64 {
    5.0
}

fn default_limit() -> i64 {
    200
}

fn validate_uf(uf: &str) -> Result<(), ValidationError> {
    if uf.len() == 2 && uf.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("uf_format"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HighRiskRequest {
    #[serde(default = "default_min_score")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub min_score: f64,

    /// Two-letter state code; all states when absent
    #[validate(custom(function = "validate_uf"))]
    pub uf: Option<String>,

    /// Companies loaded before filtering
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 5000))]
    pub limit: i64,
}

impl Default for HighRiskRequest {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            uf: None,
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HighRiskRow {
    pub cnpj: String,
    pub nm_razao_social: String,
    pub setor: String,
    pub cd_uf: String,
    pub prioridade_fiscalizacao: u8,
    pub score_risco_total: f64,
    pub classificacao_risco: String,
    pub qtd_indicios_neaf: i64,
    pub ativo_milhoes: f64,
    pub receita_milhoes: f64,
    pub liquidez: f64,
    pub endividamento: f64,
    pub margem_liquida: f64,
}

impl From<&CompanyRecord> for HighRiskRow {
    fn from(company: &CompanyRecord) -> Self {
        Self {
            cnpj: company.cnpj.clone(),
            nm_razao_social: text(&company.nm_razao_social),
            setor: text(&company.setor),
            cd_uf: text(&company.cd_uf),
            prioridade_fiscalizacao: company.fiscal_priority(),
            score_risco_total: num(company.score_risco_total),
            classificacao_risco: text(&company.classificacao_risco),
            qtd_indicios_neaf: company.qtd_indicios_neaf.unwrap_or(0),
            ativo_milhoes: num(company.ativo_milhoes),
            receita_milhoes: num(company.receita_milhoes),
            liquidez: num(company.liquidez),
            endividamento: num(company.endividamento),
            margem_liquida: num(company.margem_liquida),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HighRiskPage {
    pub listed: usize,
    /// 0 when nothing is listed
    pub mean_score: f64,
    /// Companies at inspection priority 1
    pub critical_priority: usize,
    /// Sum of listed assets, R$ millions
    pub total_assets_milhoes: f64,
    pub by_classification: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<u8, usize>,
    pub rows: Vec<HighRiskRow>,
}

pub fn render(companies: &[CompanyRecord], request: &HighRiskRequest) -> HighRiskPage {
    // A missing score never passes the threshold
    let mut rows: Vec<HighRiskRow> = companies
        .iter()
        .filter(|c| c.score_risco_total.map_or(false, |s| s >= request.min_score))
        .filter(|c| request.uf.as_deref().map_or(true, |uf| c.in_uf(uf)))
        .map(HighRiskRow::from)
        .collect();

    // Stable: within a priority the source order (highest score first) holds
    rows.sort_by_key(|r| r.prioridade_fiscalizacao);

    let listed = rows.len();
    let mean_score = if listed == 0 {
        0.0
    } else {
        rows.iter().map(|r| r.score_risco_total).sum::<f64>() / listed as f64
    };

    let mut by_classification = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    for row in &rows {
        if !row.classificacao_risco.is_empty() {
            *by_classification.entry(row.classificacao_risco.clone()).or_insert(0) += 1;
        }
        *by_priority.entry(row.prioridade_fiscalizacao).or_insert(0) += 1;
    }

    HighRiskPage {
        listed,
        mean_score,
        critical_priority: by_priority.get(&1).copied().unwrap_or(0),
        total_assets_milhoes: rows.iter().map(|r| r.ativo_milhoes).sum(),
        by_classification,
        by_priority,
        rows,
    }
}
