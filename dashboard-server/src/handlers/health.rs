//! Health check handler

use axum::Json;
use serde::Serialize;

use ecd_scoring::constants::ENGINE_VERSION;
use ecd_scoring::logic::features::layout::layout_hash;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    engine_version: &'static str,
    layout_hash: String,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        engine_version: ENGINE_VERSION,
        layout_hash: format!("{:08x}", layout_hash()),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
