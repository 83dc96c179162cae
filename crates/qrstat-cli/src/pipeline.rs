//! Factorization request pipeline.
//!
//! `Received → Authenticated → Validated → Factorized → StatsRequested →
//! Completed | Failed`. Authentication happens in the router's middleware
//! before [`FactorizationService::process`] is entered; every later stage
//! lives here. A failure at any stage ends the request with no partial
//! result.

use std::fmt;
use std::sync::Arc;

use qrstat::error::FactorizationError;
use qrstat::linalg::{householder_qr, QrFactors};
use qrstat::primitives::Matrix;
use thiserror::Error;

use crate::remote::{RemoteCallError, StatsClient};
use crate::types::{FactorizationResponse, StatsRequest};

/// Where a request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Authenticated,
    Validated,
    Factorized,
    StatsRequested,
    Completed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Authenticated => "authenticated",
            Stage::Validated => "validated",
            Stage::Factorized => "factorized",
            Stage::StatsRequested => "stats-requested",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a factorization request failed after authentication.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Invalid(#[from] FactorizationError),

    #[error("Error al comunicarse con Stats API: {0}")]
    Remote(#[from] RemoteCallError),

    /// The blocking factorization task did not finish.
    #[error("factorization task failed: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Last stage the request reached before failing.
    pub fn failed_at(&self) -> Stage {
        match self {
            PipelineError::Invalid(_) => Stage::Authenticated,
            PipelineError::Remote(_) => Stage::StatsRequested,
            PipelineError::Internal(_) => Stage::Authenticated,
        }
    }
}

/// Validates, factorizes, then asks the statistics client about the factors.
#[derive(Clone)]
pub struct FactorizationService {
    client: Arc<dyn StatsClient>,
}

impl FactorizationService {
    pub fn new(client: Arc<dyn StatsClient>) -> Self {
        Self { client }
    }

    /// Runs an authenticated request to completion.
    ///
    /// The numeric work runs on the blocking pool. The statistics call is
    /// made exactly once.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Invalid`] for a rejected matrix (the client is never
    /// called), [`PipelineError::Remote`] when the statistics call fails.
    pub async fn process(
        &self,
        matrix: Vec<Vec<f64>>,
    ) -> Result<FactorizationResponse, PipelineError> {
        let result = self.run(matrix).await;
        match &result {
            Ok(_) => tracing::info!(stage = %Stage::Completed, "factorization request done"),
            Err(e) => tracing::warn!(
                stage = %Stage::Failed,
                failed_at = %e.failed_at(),
                error = %e,
                "factorization request failed"
            ),
        }
        result
    }

    async fn run(&self, matrix: Vec<Vec<f64>>) -> Result<FactorizationResponse, PipelineError> {
        let (rows, cols) = (matrix.len(), matrix.first().map_or(0, Vec::len));
        let QrFactors { q, r } = tokio::task::spawn_blocking(move || {
            let input = Matrix::from_rows(&matrix)?;
            tracing::debug!(stage = %Stage::Validated, rows, cols);
            Ok::<_, FactorizationError>(householder_qr(&input))
        })
        .await
        .map_err(|e| PipelineError::Internal(e.to_string()))??;
        tracing::debug!(stage = %Stage::Factorized, q = ?q.shape(), r = ?r.shape());

        let request = StatsRequest {
            q: q.to_rows(),
            r: r.to_rows(),
        };
        tracing::debug!(stage = %Stage::StatsRequested);
        let stats = self.client.fetch_stats(&request).await?;

        Ok(FactorizationResponse {
            q: request.q,
            r: request.r,
            stats,
        })
    }
}

impl fmt::Debug for FactorizationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactorizationService").finish_non_exhaustive()
    }
}
