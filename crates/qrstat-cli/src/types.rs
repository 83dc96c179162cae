//! Request and response bodies shared by both services.

use qrstat::stats::StatisticsResult;
use serde::{Deserialize, Serialize};

/// Top-level error for a failed factorization request.
pub const QR_FAILURE: &str = "Error procesando matriz";

/// Top-level error for a failed statistics request.
pub const STATS_FAILURE: &str = "Error calculando estadísticas";

/// Generic error returned by the outermost handler.
pub const INTERNAL_FAILURE: &str = "Error interno del servidor";

/// Body returned in place of a result on any failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// `POST /api/qr` body. A missing `matrix` reads as an empty matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactorizationRequest {
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
}

/// `POST /api/qr` success body: the factors merged with their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorizationResponse {
    pub q: Vec<Vec<f64>>,
    pub r: Vec<Vec<f64>>,
    #[serde(flatten)]
    pub stats: StatisticsResult,
}

/// `POST /api/stats` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRequest {
    #[serde(default)]
    pub q: Vec<Vec<f64>>,
    #[serde(default)]
    pub r: Vec<Vec<f64>>,
}

/// `GET /api/login` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
