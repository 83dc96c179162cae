//! Routers and handlers for both services.
//!
//! Protected routes sit behind [`require_bearer`] via `route_layer`, so a
//! request without a valid token is refused before its body is read.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use qrstat::primitives::Matrix;
use qrstat::stats::{calculate_stats, StatisticsResult};

use crate::auth::{issue_token, require_bearer};
use crate::config::{AuthConfig, ConfigurationError};
use crate::pipeline::{FactorizationService, PipelineError};
use crate::types::{
    ErrorEnvelope, FactorizationRequest, FactorizationResponse, HealthResponse, StatsRequest,
    TokenResponse, INTERNAL_FAILURE, QR_FAILURE, STATS_FAILURE,
};

/// Handler failures, each rendered as an [`ErrorEnvelope`] with status 500.
#[derive(Debug)]
pub enum ApiError {
    /// Request understood but could not be processed.
    Processing {
        context: &'static str,
        details: String,
    },
    Configuration(ConfigurationError),
    /// Anything else; the cause is logged, never returned.
    Internal(String),
}

impl ApiError {
    fn processing(context: &'static str, details: impl ToString) -> Self {
        ApiError::Processing {
            context,
            details: details.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = match self {
            ApiError::Processing { context, details } => {
                ErrorEnvelope::with_details(context, details)
            }
            ApiError::Configuration(e) => ErrorEnvelope::new(e.to_string()),
            ApiError::Internal(cause) => {
                tracing::error!(%cause, "unhandled request failure");
                ErrorEnvelope::new(INTERNAL_FAILURE)
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Internal(rejection.body_text())
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(e: ConfigurationError) -> Self {
        ApiError::Configuration(e)
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Internal(cause) => ApiError::Internal(cause),
            other => ApiError::processing(QR_FAILURE, other),
        }
    }
}

/// Shared state of the factorization service.
#[derive(Debug, Clone)]
pub struct QrState {
    pub auth: Arc<AuthConfig>,
    pub service: Arc<FactorizationService>,
}

impl FromRef<QrState> for Arc<AuthConfig> {
    fn from_ref(state: &QrState) -> Self {
        state.auth.clone()
    }
}

/// Router of the factorization service.
pub fn build_qr_router(auth: Arc<AuthConfig>, service: Arc<FactorizationService>) -> Router {
    let state = QrState {
        auth: auth.clone(),
        service,
    };
    Router::new()
        .route("/api/qr", post(factorize_handler))
        .route_layer(middleware::from_fn_with_state(auth, require_bearer))
        .route("/api/login", get(login_handler))
        .route("/health", get(|| async { Json(HealthResponse::healthy("qr")) }))
        .with_state(state)
}

/// Router of the statistics service.
pub fn build_stats_router(auth: Arc<AuthConfig>) -> Router {
    Router::new()
        .route("/api/stats", post(stats_handler))
        .route_layer(middleware::from_fn_with_state(auth.clone(), require_bearer))
        .route("/api/login", get(login_handler))
        .route(
            "/health",
            get(|| async { Json(HealthResponse::healthy("stats")) }),
        )
        .with_state(auth)
}

async fn login_handler(
    State(auth): State<Arc<AuthConfig>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = issue_token(&auth)?;
    tracing::info!("token issued");
    Ok(Json(TokenResponse { token }))
}

async fn factorize_handler(
    State(state): State<QrState>,
    body: Result<Json<FactorizationRequest>, JsonRejection>,
) -> Result<Json<FactorizationResponse>, ApiError> {
    let Json(request) = body?;
    let response = state.service.process(request.matrix).await?;
    Ok(Json(response))
}

async fn stats_handler(
    body: Result<Json<StatsRequest>, JsonRejection>,
) -> Result<Json<StatisticsResult>, ApiError> {
    let Json(StatsRequest { q, r }) = body?;
    let q = Matrix::from_rows(&q).map_err(|e| ApiError::processing(STATS_FAILURE, e))?;
    let r = Matrix::from_rows(&r).map_err(|e| ApiError::processing(STATS_FAILURE, e))?;
    let stats = calculate_stats(&q, &r);
    tracing::debug!(q = ?q.shape(), r = ?r.shape(), "statistics computed");
    Ok(Json(stats))
}
