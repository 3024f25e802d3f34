//! Company model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use ecd_scoring::{FeatureRow, RowId};

/// One company as read from the feature view: display columns plus the
/// eight scoring indicators. Any column may be missing in the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompanyRecord {
    pub cnpj: String,
    pub nm_razao_social: Option<String>,
    pub nm_fantasia: Option<String>,
    pub cd_uf: Option<String>,
    pub setor: Option<String>,
    pub classificacao_risco: Option<String>,
    pub qtd_indicios_neaf: Option<i64>,

    pub score_risco_total: Option<f64>,
    pub score_equacao_contabil: Option<f64>,
    pub score_neaf: Option<f64>,
    pub ativo_milhoes: Option<f64>,
    pub receita_milhoes: Option<f64>,
    pub liquidez: Option<f64>,
    pub endividamento: Option<f64>,
    pub margem_liquida: Option<f64>,
}

/// Assets above this (R$ millions) make a company financially relevant
const RELEVANT_ASSETS_MILHOES: f64 = 100.0;

impl CompanyRecord {
    /// Engine input for this company, keyed by its position in the batch
    pub fn to_feature_row(&self, position: usize) -> FeatureRow {
        FeatureRow::from_values(
            RowId::from(position),
            [
                self.score_risco_total,
                self.score_equacao_contabil,
                self.score_neaf,
                self.ativo_milhoes,
                self.receita_milhoes,
                self.liquidez,
                self.endividamento,
                self.margem_liquida,
            ],
        )
    }

    /// Inspection priority, 1 (first) to 5, from risk score and size
    pub fn fiscal_priority(&self) -> u8 {
        let score = self.score_risco_total.unwrap_or(0.0);
        let relevant = self.ativo_milhoes.unwrap_or(0.0) >= RELEVANT_ASSETS_MILHOES;

        match (score >= 7.0, relevant) {
            (true, true) => 1,
            (true, false) | (false, true) => 2,
            _ if score >= 5.0 => 3,
            _ if score >= 3.0 => 4,
            _ => 5,
        }
    }

    /// Case-insensitive state filter
    pub fn in_uf(&self, uf: &str) -> bool {
        self.cd_uf
            .as_deref()
            .map_or(false, |own| own.trim().eq_ignore_ascii_case(uf.trim()))
    }
}

#[cfg(test)]
impl CompanyRecord {
    /// Deterministic fixture company with every column filled
    pub fn sample(i: usize) -> Self {
        const UFS: [&str; 4] = ["SC", "PR", "RS", "SP"];
        const SETORES: [&str; 3] = ["Comércio varejista", "Construção de edifícios", "Transporte terrestre"];

        let score = ((i * 37) % 101) as f64 / 10.0;
        let classificacao = if score >= 7.0 {
            "Muito Alto"
        } else if score >= 5.0 {
            "Alto"
        } else {
            "Médio"
        };

        Self {
            cnpj: format!("{:014}", 11_222_333_000_100u64 + i as u64),
            nm_razao_social: Some(format!("Empresa {} Ltda", i)),
            nm_fantasia: None,
            cd_uf: Some(UFS[i % UFS.len()].to_string()),
            setor: Some(SETORES[i % SETORES.len()].to_string()),
            classificacao_risco: Some(classificacao.to_string()),
            qtd_indicios_neaf: Some((i % 4) as i64),
            score_risco_total: Some(score),
            score_equacao_contabil: Some(((i * 7) % 11) as f64 * 0.3),
            score_neaf: Some(((i * i) % 13) as f64 * 0.5),
            ativo_milhoes: Some(20.0 + ((i * 53) % 89) as f64 * 2.1),
            receita_milhoes: Some(15.0 + ((i * 29) % 71) as f64 * 1.4),
            liquidez: Some(0.6 + ((i * 5) % 9) as f64 * 0.15),
            endividamento: Some(0.3 + ((i * 3) % 7) as f64 * 0.08),
            margem_liquida: Some(-4.0 + ((i * 11) % 17) as f64 * 1.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_row_carries_every_indicator() {
        let mut record = CompanyRecord::sample(3);
        record.liquidez = None;

        let row = record.to_feature_row(7);
        assert_eq!(row.row_id, RowId::from(7usize));
        assert_eq!(row.features.len(), 8);
        assert_eq!(row.total_risk(), record.score_risco_total);
        assert_eq!(row.get("liquidez"), None);
        assert!(row.features.contains_key("liquidez"));
        assert!(!row.is_complete());
    }

    #[test]
    fn test_fiscal_priority() {
        let with = |score: Option<f64>, ativo: Option<f64>| CompanyRecord {
            score_risco_total: score,
            ativo_milhoes: ativo,
            ..CompanyRecord::sample(0)
        };

        assert_eq!(with(Some(8.0), Some(150.0)).fiscal_priority(), 1);
        assert_eq!(with(Some(8.0), Some(10.0)).fiscal_priority(), 2);
        assert_eq!(with(Some(1.0), Some(100.0)).fiscal_priority(), 2);
        assert_eq!(with(Some(5.0), Some(10.0)).fiscal_priority(), 3);
        assert_eq!(with(Some(3.5), None).fiscal_priority(), 4);
        assert_eq!(with(None, None).fiscal_priority(), 5);
    }

    #[test]
    fn test_uf_filter() {
        let record = CompanyRecord {
            cd_uf: Some("sc ".to_string()),
            ..CompanyRecord::sample(0)
        };
        assert!(record.in_uf("SC"));
        assert!(!record.in_uf("PR"));

        let unknown = CompanyRecord {
            cd_uf: None,
            ..CompanyRecord::sample(0)
        };
        assert!(!unknown.in_uf("SC"));
    }
}
