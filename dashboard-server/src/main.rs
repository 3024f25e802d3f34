//! ECD Risk Dashboard Backend Server
//!
//! JSON API behind the accounting-risk dashboard: company indicators come
//! from a warehouse view, the ML priority page runs the scoring engine on
//! them per request.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ECD DASHBOARD                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Auth     │  │  Pages                  │ │
//! │  │  (Axum)   │  │  (JWT)    │  │  ML priority, high risk │ │
//! │  └─────┬─────┘  └───────────┘  └────────────┬────────────┘ │
//! │        │                                    ▼              │
//! │        │                        ┌─────────────────────┐    │
//! │        │                        │ ecd-scoring engine  │    │
//! │        ▼                        └─────────────────────┘    │
//! │  ┌─────────────┐   ┌──────────────────┐                    │
//! │  │ Query cache │──▶│ PostgreSQL view  │                    │
//! │  └─────────────┘   └──────────────────┘                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod cache;
mod config;
mod db;
mod models;
mod handlers;
mod middleware;
mod pages;
mod error;
#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::CachedCompanySource;
use crate::db::{CompanySource, PgCompanySource};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ecd_dashboard=debug,ecd_scoring=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();
    config.validate().context("Invalid configuration")?;

    tracing::info!("ECD Dashboard Server starting...");
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));
    tracing::info!(
        "Feature view: {}, cache TTL {}s ({} entries), ML seed {}",
        config.feature_view,
        config.cache_ttl.as_secs(),
        config.cache_capacity,
        config.scoring.random_seed
    );
    if config.password_hash.is_none() {
        tracing::warn!("DASHBOARD_PASSWORD_HASH is not set; login is disabled");
    }

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    let source: Arc<dyn CompanySource> = Arc::new(PgCompanySource::new(pool, &config.feature_view));
    let companies = Arc::new(CachedCompanySource::new(
        source,
        config.cache_capacity,
        config.cache_ttl,
    ));

    // Build application state
    let state = AppState {
        companies,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<dyn CompanySource>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    // Dashboard routes (session JWT)
    let dashboard_routes = Router::new()
        .route("/api/v1/ml/priorities", get(handlers::ml::priorities))
        .route("/api/v1/ml/layout", get(handlers::ml::layout))
        .route("/api/v1/companies/high-risk", get(handlers::companies::high_risk))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(dashboard_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
