//! Bearer-token gate.
//!
//! Tokens are HS256 JWTs with no custom claims, only `iat` and `exp`.
//! Verification is stateless: nothing is stored server-side.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AuthConfig, ConfigurationError};
use crate::pipeline::Stage;
use crate::types::ErrorEnvelope;

/// Lifetime of an issued token (4 days).
pub const TOKEN_VALIDITY: Duration = Duration::from_secs(4 * 24 * 60 * 60);

/// Registered claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iat: u64,
    pub exp: u64,
}

/// Why a request was refused at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header.
    #[error("Token no proporcionado")]
    MissingToken,

    /// Header present but the token is malformed, badly signed or expired.
    #[error("Token inválido o expirado")]
    InvalidOrExpiredToken,
}

impl AuthError {
    pub fn status(self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidOrExpiredToken => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

/// Issues a token valid for [`TOKEN_VALIDITY`] from now.
///
/// # Errors
///
/// [`ConfigurationError::MissingSecret`] if no secret is configured.
pub fn issue_token(config: &AuthConfig) -> Result<String, ConfigurationError> {
    issue_token_at(
        config.secret()?,
        jsonwebtoken::get_current_timestamp(),
        TOKEN_VALIDITY,
    )
}

/// Issues a token as if signed at `issued_at` (seconds since the epoch).
///
/// # Errors
///
/// [`ConfigurationError::Signing`] if the token cannot be encoded.
pub fn issue_token_at(
    secret: &str,
    issued_at: u64,
    validity: Duration,
) -> Result<String, ConfigurationError> {
    let claims = Claims {
        iat: issued_at,
        exp: issued_at.saturating_add(validity.as_secs()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ConfigurationError::Signing(e.to_string()))
}

/// Checks signature and expiry of `token`.
///
/// A missing secret makes every token invalid.
///
/// # Errors
///
/// [`AuthError::InvalidOrExpiredToken`] on any verification failure.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, AuthError> {
    let secret = config
        .secret()
        .map_err(|_| AuthError::InvalidOrExpiredToken)?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(reason = %e, "token rejected");
        AuthError::InvalidOrExpiredToken
    })
}

/// Extracts the credential from `Authorization: <scheme> <token>`.
///
/// Only the presence of a second field is required; the scheme name is not
/// checked.
///
/// # Errors
///
/// [`AuthError::MissingToken`] without the header,
/// [`AuthError::InvalidOrExpiredToken`] when it has no second field.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    value
        .to_str()
        .ok()
        .and_then(|v| v.split_whitespace().nth(1))
        .ok_or(AuthError::InvalidOrExpiredToken)
}

/// Middleware admitting only requests with a valid, unexpired token.
pub async fn require_bearer(
    State(auth): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    tracing::debug!(stage = %Stage::Received, path = %request.uri().path());
    let admitted = bearer_token(request.headers()).and_then(|token| verify_token(&auth, token));
    match admitted {
        Ok(_) => {
            tracing::debug!(stage = %Stage::Authenticated, path = %request.uri().path());
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(
                stage = %Stage::Failed,
                path = %request.uri().path(),
                status = e.status().as_u16(),
                "{e}"
            );
            e.into_response()
        }
    }
}
