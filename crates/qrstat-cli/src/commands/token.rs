//! `qrs token`: mint a bearer token offline.
//!
//! Useful for provisioning the factorization service's outbound credential
//! against a statistics service that shares the secret.

use crate::auth::{issue_token, TOKEN_VALIDITY};
use crate::config::AuthConfig;
use crate::error::{CliError, Result};
use crate::types::TokenResponse;

pub(crate) fn run(auth: &AuthConfig, json: bool) -> Result<()> {
    let token = issue_token(auth)?;
    tracing::debug!(validity_secs = TOKEN_VALIDITY.as_secs(), "token minted");
    if json {
        let body = serde_json::to_string(&TokenResponse { token })
            .map_err(|e| CliError::InvalidFormat(e.to_string()))?;
        println!("{body}");
    } else {
        println!("{token}");
    }
    Ok(())
}
