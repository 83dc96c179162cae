//! Outbound call from the factorization service to the statistics service.
//!
//! The call is a trait seam so the pipeline can be driven by an in-process
//! client in tests. [`HttpStatsClient`] is the production implementation.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use qrstat::stats::StatisticsResult;
use thiserror::Error;

use crate::config::RemoteStatsConfig;
use crate::types::{ErrorEnvelope, StatsRequest};

/// Boxed future for async trait methods
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Ways the statistics hop can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteCallError {
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Unreachable(String),

    #[error("Request failed with status code {status}{}", remote_suffix(.message))]
    NonSuccessStatus {
        status: u16,
        /// Error text from the remote envelope, if it sent one.
        message: Option<String>,
    },

    #[error("malformed statistics response: {0}")]
    MalformedResponse(String),

    #[error("statistics request could not be encoded: {0}")]
    InvalidRequest(String),
}

fn remote_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Computes statistics for a pair of factors somewhere else.
pub trait StatsClient: Send + Sync {
    fn fetch_stats<'a>(
        &'a self,
        request: &'a StatsRequest,
    ) -> BoxFuture<'a, Result<StatisticsResult, RemoteCallError>>;
}

/// `POST`s factors to the statistics endpoint with the configured credential.
#[derive(Debug, Clone)]
pub struct HttpStatsClient {
    config: RemoteStatsConfig,
    agent: ureq::Agent,
}

impl HttpStatsClient {
    pub fn new(config: RemoteStatsConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { config, agent }
    }

    fn post_blocking(
        agent: &ureq::Agent,
        url: &str,
        authorization: &str,
        body: &[u8],
        timeout: Duration,
    ) -> Result<StatisticsResult, RemoteCallError> {
        let response = agent
            .post(url)
            .set("Authorization", authorization)
            .set("Content-Type", "application/json")
            .send_bytes(body)
            .map_err(|e| map_ureq_error(e, timeout))?;
        response
            .into_json::<StatisticsResult>()
            .map_err(|e| RemoteCallError::MalformedResponse(e.to_string()))
    }
}

impl StatsClient for HttpStatsClient {
    fn fetch_stats<'a>(
        &'a self,
        request: &'a StatsRequest,
    ) -> BoxFuture<'a, Result<StatisticsResult, RemoteCallError>> {
        Box::pin(async move {
            let body = serde_json::to_vec(request)
                .map_err(|e| RemoteCallError::InvalidRequest(e.to_string()))?;
            let agent = self.agent.clone();
            let url = self.config.url.clone();
            let authorization = format!("Bearer {}", self.config.credential);
            let timeout = self.config.timeout;

            let call = tokio::task::spawn_blocking(move || {
                Self::post_blocking(&agent, &url, &authorization, &body, timeout)
            });
            let outcome = match tokio::time::timeout(timeout, call).await {
                Err(_) => Err(RemoteCallError::Timeout(timeout)),
                Ok(Err(join)) => Err(RemoteCallError::Unreachable(join.to_string())),
                Ok(Ok(result)) => result,
            };
            match &outcome {
                Ok(_) => tracing::debug!(url = %self.config.url, "statistics received"),
                Err(e) => tracing::warn!(url = %self.config.url, error = %e, "statistics call failed"),
            }
            outcome
        })
    }
}

fn map_ureq_error(err: ureq::Error, timeout: Duration) -> RemoteCallError {
    match err {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_string()
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorEnvelope>(&body).ok())
                .map(|envelope| envelope.error);
            RemoteCallError::NonSuccessStatus { status, message }
        }
        ureq::Error::Transport(transport) => {
            let timed_out = std::error::Error::source(&transport)
                .and_then(|source| source.downcast_ref::<io::Error>())
                .is_some_and(|io| {
                    matches!(io.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
                });
            if timed_out {
                RemoteCallError::Timeout(timeout)
            } else {
                RemoteCallError::Unreachable(transport.to_string())
            }
        }
    }
}
