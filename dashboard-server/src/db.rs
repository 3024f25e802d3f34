//! Database module - PostgreSQL pool and the company query layer

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::models::CompanyRecord;

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Where the pages get their companies from
#[axum::async_trait]
pub trait CompanySource: Send + Sync {
    /// Up to `limit` companies, highest total risk score first
    async fn high_risk_companies(&self, limit: i64) -> Result<Vec<CompanyRecord>, sqlx::Error>;
}

/// Reads a pre-aggregated view with one row per company
pub struct PgCompanySource {
    pool: PgPool,
    query: String,
}

impl PgCompanySource {
    /// `view` must already be a checked identifier (see `Config::validate`)
    pub fn new(pool: PgPool, view: &str) -> Self {
        Self {
            pool,
            query: company_query(view),
        }
    }
}

#[axum::async_trait]
impl CompanySource for PgCompanySource {
    async fn high_risk_companies(&self, limit: i64) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        let companies = sqlx::query_as::<_, CompanyRecord>(&self.query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} companies (limit {})", companies.len(), limit);
        Ok(companies)
    }
}

/// Indicator columns are cast so NUMERIC and DECIMAL views decode as f64
fn company_query(view: &str) -> String {
    format!(
        r#"
        SELECT
            cnpj,
            nm_razao_social,
            nm_fantasia,
            cd_uf,
            setor,
            classificacao_risco,
            qtd_indicios_neaf::int8 AS qtd_indicios_neaf,
            score_risco_total::float8 AS score_risco_total,
            score_equacao_contabil::float8 AS score_equacao_contabil,
            score_neaf::float8 AS score_neaf,
            ativo_milhoes::float8 AS ativo_milhoes,
            receita_milhoes::float8 AS receita_milhoes,
            liquidez::float8 AS liquidez,
            endividamento::float8 AS endividamento,
            margem_liquida::float8 AS margem_liquida
        FROM {view}
        ORDER BY score_risco_total DESC NULLS LAST, ativo_milhoes DESC NULLS LAST
        LIMIT $1
        "#
    )
}
