//! `qrs serve-qr` and `qrs serve-stats`.
//!
//! Each command owns a tokio runtime, binds its listener and serves until
//! Ctrl+C.

pub mod routes;


use std::sync::Arc;

use axum::Router;
use colored::Colorize;

use crate::auth::TOKEN_VALIDITY;
use crate::config::{AuthConfig, RemoteStatsConfig, ServerConfig};
use crate::error::{CliError, Result};
use crate::output;
use crate::pipeline::FactorizationService;
use crate::remote::HttpStatsClient;

pub use routes::{build_qr_router, build_stats_router, ApiError, QrState};

/// Factorization service entry point (blocking)
pub(crate) fn run_qr(
    server: &ServerConfig,
    auth: AuthConfig,
    remote: RemoteStatsConfig,
) -> Result<()> {
    output::section("qrs factorization service");
    output::kv("Binding", server.bind_addr());
    output::kv("Statistics", &remote.url);
    output::kv("Remote timeout", format!("{}s", remote.timeout.as_secs_f64()));
    report_secret(&auth);

    let service = FactorizationService::new(Arc::new(HttpStatsClient::new(remote)));
    let app = build_qr_router(Arc::new(auth), Arc::new(service));
    serve(
        server,
        app,
        &[
            ("POST", "/api/qr", "QR factorization + statistics (bearer)"),
            ("GET", "/api/login", "Issue a bearer token"),
            ("GET", "/health", "Health check"),
        ],
    )
}

/// Statistics service entry point (blocking)
pub(crate) fn run_stats(server: &ServerConfig, auth: AuthConfig) -> Result<()> {
    output::section("qrs statistics service");
    output::kv("Binding", server.bind_addr());
    report_secret(&auth);

    let app = build_stats_router(Arc::new(auth));
    serve(
        server,
        app,
        &[
            ("POST", "/api/stats", "Statistics over Q and R (bearer)"),
            ("GET", "/api/login", "Issue a bearer token"),
            ("GET", "/health", "Health check"),
        ],
    )
}

fn report_secret(auth: &AuthConfig) {
    if auth.has_secret() {
        output::kv(
            "Token validity",
            format!("{} days", TOKEN_VALIDITY.as_secs() / 86_400),
        );
    } else {
        output::warning("JWT_SECRET not set: logins fail and every token is rejected");
    }
}

fn serve(server: &ServerConfig, app: Router, endpoints: &[(&str, &str, &str)]) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Server(format!("Failed to create runtime: {e}")))?;
    let bind_addr = server.bind_addr();

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind {bind_addr}: {e}")))?;

        println!();
        println!("{}", "Endpoints:".green().bold());
        for (method, path, about) in endpoints {
            println!("  {method:<5} {path:<12} - {about}");
        }
        println!();
        println!(
            "{}",
            format!("Server ready on http://{bind_addr} (Ctrl+C to stop)").green()
        );
        tracing::info!(addr = %bind_addr, "listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| CliError::Server(format!("Server error: {e}")))?;

        println!();
        println!("{}", "Server stopped".yellow());
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a handler the server runs until killed.
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
