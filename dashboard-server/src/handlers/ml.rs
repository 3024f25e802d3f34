//! ML priority handlers

use axum::{extract::{State, Query}, Json};
use validator::Validate;

use ecd_scoring::LayoutInfo;

use crate::{AppState, AppResult, AppError};
use crate::middleware::auth::Session;
use crate::pages::ml_priority::{self, MlPriorityPage, MlPriorityRequest};

/// Score the loaded companies and rank them for inspection
pub async fn priorities(
    State(state): State<AppState>,
    _session: Session,
    Query(request): Query<MlPriorityRequest>,
) -> AppResult<Json<MlPriorityPage>> {
    request.validate()?;

    let companies = state.companies.high_risk_companies(request.limit).await?;
    let scoring = state.config.scoring.clone();

    // Model fitting is CPU-bound; keep it off the reactor
    let page = tokio::task::spawn_blocking(move || {
        ml_priority::render(&companies, &request, &scoring)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("scoring task failed: {}", e)))??;

    if page.ml_skipped {
        tracing::info!(
            "ML skipped for {} companies: {}",
            page.total_companies,
            page.message.as_deref().unwrap_or_default()
        );
    } else {
        tracing::info!(
            "ML page: {} companies, {} anomalies, {} critical",
            page.total_companies,
            page.metrics.anomalies,
            page.metrics.critical
        );
    }

    Ok(Json(page))
}

/// Feature layout the engine expects
pub async fn layout(_session: Session) -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
