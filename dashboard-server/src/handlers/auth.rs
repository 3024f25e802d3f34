//! Authentication handlers
//!
//! The dashboard has one shared password. A correct password buys a
//! session JWT; every `/api/v1` route except login requires it.

use axum::{extract::State, Json};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use jsonwebtoken::{encode, Header, EncodingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, Duration};
use validator::Validate;

use crate::{AppState, AppError, AppResult};

/// Session subject; there are no per-user accounts
pub const SESSION_SUBJECT: &str = "dashboard";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Always SESSION_SUBJECT
    pub jti: String,      // Session ID
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()?;

    let Some(stored) = state.config.password_hash.as_deref() else {
        tracing::warn!("Login attempted but DASHBOARD_PASSWORD_HASH is not set");
        return Err(AppError::InvalidCredentials);
    };

    // Verify password
    let parsed_hash = PasswordHash::new(stored)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            tracing::warn!("Rejected dashboard login");
            AppError::InvalidCredentials
        })?;

    // Generate JWT
    let ttl = Duration::hours(state.config.jwt_expiration_hours as i64);
    let (token, expires_at) = generate_jwt(&state.config.jwt_secret, ttl)?;

    tracing::info!("Dashboard session opened, expires {}", expires_at);

    Ok(Json(LoginResponse { token, expires_at }))
}

/// Generate a session JWT valid for `ttl`
pub fn generate_jwt(secret: &str, ttl: Duration) -> AppResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let exp = now + ttl;

    let claims = Claims {
        sub: SESSION_SUBJECT.to_string(),
        jti: Uuid::new_v4().to_string(),
        exp: exp.timestamp().max(0) as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes())
    ).map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok((token, exp))
}
