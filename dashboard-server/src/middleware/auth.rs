//! Authentication middleware

use axum::{
    extract::{State, Request},
    middleware::Next,
    response::Response,
    http::header::AUTHORIZATION,
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use crate::{AppState, AppError};
use crate::handlers::auth::{Claims, SESSION_SUBJECT};

/// Session context extracted from JWT
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Middleware: Require a dashboard session JWT
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&req)?;
    let session = decode_session(&token, &state.config.jwt_secret)?;

    tracing::debug!(
        "Session {} (expires {}) on {}",
        session.session_id,
        session.expires_at,
        req.uri().path()
    );

    // Insert into request extensions
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

/// Validate signature, expiry and subject
pub fn decode_session(token: &str, secret: &str) -> Result<Session, AppError> {
    let mut validation = Validation::default();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation.sub = Some(SESSION_SUBJECT.to_string());

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation
    )?.claims;

    Ok(Session {
        session_id: Uuid::parse_str(&claims.jti).map_err(|_| AppError::TokenInvalid)?,
        expires_at: DateTime::from_timestamp(claims.exp as i64, 0).ok_or(AppError::TokenInvalid)?,
    })
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Result<String, AppError> {
    let auth_header = req.headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

// Implement FromRequestParts for Session
#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::handlers::auth::generate_jwt;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_round_trip() {
        let (token, expires_at) = generate_jwt(SECRET, Duration::hours(2)).unwrap();
        let session = decode_session(&token, SECRET).unwrap();

        assert_eq!(session.expires_at.timestamp(), expires_at.timestamp());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let (token, _) = generate_jwt(SECRET, Duration::hours(2)).unwrap();
        assert!(matches!(decode_session(&token, "other"), Err(AppError::TokenInvalid)));
    }

    #[test]
    fn test_expired_token() {
        let (token, _) = generate_jwt(SECRET, Duration::hours(-2)).unwrap();
        assert!(matches!(decode_session(&token, SECRET), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(decode_session("not.a.jwt", SECRET), Err(AppError::TokenInvalid)));
    }
}
