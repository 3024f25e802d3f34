//! Router tests against a stub company source

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use crate::config::Config;
use crate::db::CompanySource;
use crate::handlers::auth::generate_jwt;
use crate::models::CompanyRecord;
use crate::{create_router, AppState};

const PASSWORD: &str = "ecd2025";

struct StubSource {
    companies: Vec<CompanyRecord>,
}

#[axum::async_trait]
impl CompanySource for StubSource {
    async fn high_risk_companies(&self, limit: i64) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        Ok(self.companies.iter().take(limit as usize).cloned().collect())
    }
}

fn state_with(companies: usize) -> AppState {
    let hash = Argon2::default()
        .hash_password(PASSWORD.as_bytes(), &SaltString::generate(&mut OsRng))
        .unwrap()
        .to_string();

    let mut config = Config::from_lookup(|_| None);
    config.password_hash = Some(hash);

    AppState {
        companies: Arc::new(StubSource {
            companies: (0..companies).map(CompanyRecord::sample).collect(),
        }),
        config,
    }
}

fn session_token(state: &AppState) -> String {
    generate_jwt(&state.config.jwt_secret, Duration::hours(1)).unwrap().0
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn login(password: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/v1/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "password": password }).to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(create_router(state_with(0)), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn login_then_use_token() {
    let state = state_with(0);

    let (status, body) = send(create_router(state.clone()), login(PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert!(body["expires_at"].is_string());

    let (status, body) = send(create_router(state), get("/api/v1/ml/layout", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feature_count"], 8);
    assert_eq!(body["feature_names"][0], "score_risco_total");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (status, body) = send(create_router(state_with(0)), login("senha errada")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid password");
}

#[tokio::test]
async fn login_closed_without_password_hash() {
    let mut state = state_with(0);
    state.config.password_hash = None;

    let (status, _) = send(create_router(state), login(PASSWORD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_requires_password() {
    let (status, _) = send(create_router(state_with(0)), login("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_routes_require_session() {
    let state = state_with(20);

    for uri in ["/api/v1/ml/priorities", "/api/v1/ml/layout", "/api/v1/companies/high-risk"] {
        let (status, body) = send(create_router(state.clone()), get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["status"], 401);
    }

    let (expired, _) = generate_jwt(&state.config.jwt_secret, Duration::hours(-2)).unwrap();
    let (status, body) = send(create_router(state), get("/api/v1/ml/layout", Some(&expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token has expired");
}

#[tokio::test]
async fn ml_priorities_scores_companies() {
    let state = state_with(30);
    let token = session_token(&state);

    let (status, body) = send(
        create_router(state),
        get("/api/v1/ml/priorities?top=5", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ml_skipped"], false);
    assert_eq!(body["top"].as_array().unwrap().len(), 5);
    assert_eq!(body["rows"].as_array().unwrap().len(), 30);
    assert_eq!(body["metrics"]["clusters"], 4);
    assert!(body["tier_distribution"]["Crítica"].is_number());
}

#[tokio::test]
async fn ml_priorities_falls_back_on_small_batch() {
    let state = state_with(4);
    let token = session_token(&state);

    let (status, body) = send(
        create_router(state),
        get("/api/v1/ml/priorities", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ml_skipped"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("insufficient data to train model"));
    assert_eq!(body["rows"].as_array().unwrap().len(), 4);
    assert_eq!(body["rows"][0]["cluster"], -1);
}

#[tokio::test]
async fn high_risk_filters_by_state() {
    let state = state_with(40);
    let token = session_token(&state);

    let (status, body) = send(
        create_router(state),
        get("/api/v1/companies/high-risk?uf=SC&min_score=5", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(body["listed"].as_u64().unwrap() as usize, rows.len());
    assert!(rows.iter().all(|r| r["cd_uf"] == "SC"));
    assert!(rows.iter().all(|r| r["score_risco_total"].as_f64().unwrap() >= 5.0));
}

#[tokio::test]
async fn invalid_query_is_bad_request() {
    let state = state_with(10);
    let token = session_token(&state);

    for uri in [
        "/api/v1/ml/priorities?limit=0",
        "/api/v1/ml/priorities?top=1000",
        "/api/v1/companies/high-risk?uf=SCX",
        "/api/v1/companies/high-risk?min_score=42",
        "/api/v1/companies/high-risk?min_score=alto",
    ] {
        let (status, _) = send(create_router(state.clone()), get(uri, Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}
