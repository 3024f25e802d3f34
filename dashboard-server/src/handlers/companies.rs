//! Company listing handlers

use axum::{extract::{State, Query}, Json};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::middleware::auth::Session;
use crate::pages::high_risk::{self, HighRiskPage, HighRiskRequest};

/// Companies above a risk threshold, optionally for one state
pub async fn high_risk(
    State(state): State<AppState>,
    _session: Session,
    Query(request): Query<HighRiskRequest>,
) -> AppResult<Json<HighRiskPage>> {
    request.validate()?;

    let companies = state.companies.high_risk_companies(request.limit).await?;
    let page = high_risk::render(&companies, &request);

    tracing::debug!(
        "High-risk page: {} of {} companies (min score {}, uf {:?})",
        page.listed,
        companies.len(),
        request.min_score,
        request.uf
    );

    Ok(Json(page))
}
