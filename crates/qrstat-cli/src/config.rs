//! Service configuration.
//!
//! Each service receives its configuration as values at construction time.
//! Nothing here is read from the environment mid-request; the command line
//! (with its `env` fallbacks) is the only place environment variables are
//! consulted.

use std::time::Duration;
use thiserror::Error;

/// Default bound on the outbound statistics call.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration problems surfaced to clients or at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No signing secret configured.
    #[error("JWT_SECRET no está definido en las variables de entorno")]
    MissingSecret,

    /// The token library refused to sign.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Create config with custom port (builder pattern)
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create config with custom host (builder pattern)
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Get bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Symmetric secret used to issue and verify inbound bearer tokens.
#[derive(Clone, Default)]
pub struct AuthConfig {
    secret: Option<String>,
}

impl AuthConfig {
    /// An empty secret is treated as absent.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// The signing secret.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MissingSecret`] when none is configured.
    pub fn secret(&self) -> Result<&str, ConfigurationError> {
        self.secret.as_deref().ok_or(ConfigurationError::MissingSecret)
    }

    /// Whether a secret is configured.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}

// Never print the secret.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where and how the factorization service reaches the statistics service.
///
/// `credential` is the bearer token presented on the outbound call. It is
/// independent of the secret the factorization service verifies inbound
/// tokens with.
#[derive(Clone)]
pub struct RemoteStatsConfig {
    /// Full URL of the statistics endpoint
    pub url: String,
    /// Outbound bearer credential
    pub credential: String,
    /// Bound on the whole remote call
    pub timeout: Duration,
}

impl RemoteStatsConfig {
    /// Config with the default timeout.
    pub fn new(url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credential: credential.into(),
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Override the timeout (builder pattern)
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for RemoteStatsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStatsConfig")
            .field("url", &self.url)
            .field("credential", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
