//! End-to-end tests: both services on ephemeral ports, driven over HTTP.

#![allow(clippy::unwrap_used)] // Tests can use unwrap

use std::sync::Arc;
use std::time::Duration;

use qrstat_cli::auth::{issue_token, issue_token_at, TOKEN_VALIDITY};
use qrstat_cli::types::ErrorEnvelope;
use qrstat_cli::{
    build_qr_router, build_stats_router, AuthConfig, FactorizationService, HttpStatsClient,
    RemoteStatsConfig,
};

const QR_SECRET: &str = "qr-secret";
const STATS_SECRET: &str = "stats-secret";

// ============================================================================
// Harness
// ============================================================================

async fn spawn(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_stats() -> String {
    spawn(build_stats_router(Arc::new(AuthConfig::new(Some(
        STATS_SECRET.to_string(),
    )))))
    .await
}

/// Factorization service pointed at `stats_url` with `credential`.
async fn spawn_qr(stats_url: String, credential: String) -> String {
    spawn_qr_with_timeout(stats_url, credential, Duration::from_secs(5)).await
}

async fn spawn_qr_with_timeout(stats_url: String, credential: String, timeout: Duration) -> String {
    let remote = RemoteStatsConfig::new(stats_url, credential).with_timeout(timeout);
    let service = FactorizationService::new(Arc::new(HttpStatsClient::new(remote)));
    spawn(build_qr_router(
        Arc::new(AuthConfig::new(Some(QR_SECRET.to_string()))),
        Arc::new(service),
    ))
    .await
}

fn stats_credential() -> String {
    issue_token(&AuthConfig::new(Some(STATS_SECRET.to_string()))).unwrap()
}

fn qr_token() -> String {
    issue_token(&AuthConfig::new(Some(QR_SECRET.to_string()))).unwrap()
}

struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    fn envelope(&self) -> ErrorEnvelope {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn call(method: &'static str, url: String, auth: Option<String>, body: Option<String>) -> Reply {
    tokio::task::spawn_blocking(move || {
        let mut request = ureq::request(method, &url);
        if let Some(auth) = auth {
            request = request.set("Authorization", &auth);
        }
        let result = match body {
            Some(body) => request
                .set("Content-Type", "application/json")
                .send_string(&body),
            None => request.call(),
        };
        match result {
            Ok(resp) => Reply {
                status: resp.status(),
                body: resp.into_string().unwrap(),
            },
            Err(ureq::Error::Status(status, resp)) => Reply {
                status,
                body: resp.into_string().unwrap(),
            },
            Err(e) => panic!("transport error: {e}"),
        }
    })
    .await
    .unwrap()
}

fn bearer(token: &str) -> Option<String> {
    Some(format!("Bearer {token}"))
}

const EXAMPLE: &str = r#"{"matrix": [[12, -51], [6, 167], [-4, 24]]}"#;

// ============================================================================
// Full pipeline
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_factorization_merges_remote_statistics() {
    let stats = spawn_stats().await;
    let qr = spawn_qr(format!("{stats}/api/stats"), stats_credential()).await;

    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&qr_token()),
        Some(EXAMPLE.to_string()),
    )
    .await;

    assert_eq!(reply.status, 200, "{}", reply.body);
    let json = reply.json();
    let object = json.as_object().unwrap();
    for key in ["q", "r", "max", "min", "average", "total", "isQDiagonal", "isRDiagonal"] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert_eq!(json["q"].as_array().unwrap().len(), 3);
    assert_eq!(json["r"][0].as_array().unwrap().len(), 2);
    assert!((json["r"][0][0].as_f64().unwrap().abs() - 14.0).abs() < 1e-9);
    assert!((json["r"][1][1].as_f64().unwrap().abs() - 175.0).abs() < 1e-9);
    assert_eq!(json["isRDiagonal"], false);
    assert!(json["max"].as_f64().unwrap() >= json["min"].as_f64().unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_validation_failure_reports_details() {
    let stats = spawn_stats().await;
    let qr = spawn_qr(format!("{stats}/api/stats"), stats_credential()).await;

    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&qr_token()),
        Some(r#"{"matrix": []}"#.to_string()),
    )
    .await;

    assert_eq!(reply.status, 500);
    assert_eq!(
        reply.envelope(),
        ErrorEnvelope::with_details("Error procesando matriz", "Matriz vacía")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_remote_rejection_surfaces_without_factors() {
    let stats = spawn_stats().await;
    // Signed with the wrong secret: the statistics service answers 403.
    let wrong = issue_token(&AuthConfig::new(Some("not-the-stats-secret".into()))).unwrap();
    let qr = spawn_qr(format!("{stats}/api/stats"), wrong).await;

    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&qr_token()),
        Some(EXAMPLE.to_string()),
    )
    .await;

    assert_eq!(reply.status, 500);
    let json = reply.json();
    assert!(json.get("q").is_none());
    assert!(json.get("r").is_none());
    assert_eq!(json["error"], "Error procesando matriz");
    let details = json["details"].as_str().unwrap();
    assert!(details.starts_with("Error al comunicarse con Stats API: "), "{details}");
    assert!(details.contains("403"), "{details}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_statistics_service() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let qr = spawn_qr(format!("http://127.0.0.1:{port}/api/stats"), stats_credential()).await;

    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&qr_token()),
        Some(EXAMPLE.to_string()),
    )
    .await;

    assert_eq!(reply.status, 500);
    let envelope = reply.envelope();
    assert_eq!(envelope.error, "Error procesando matriz");
    assert!(envelope
        .details
        .unwrap()
        .starts_with("Error al comunicarse con Stats API: "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_silent_statistics_service_times_out() {
    // Accepts connections (kernel backlog) and never replies.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = silent.local_addr().unwrap().port();
    let qr = spawn_qr_with_timeout(
        format!("http://127.0.0.1:{port}/api/stats"),
        stats_credential(),
        Duration::from_millis(300),
    )
    .await;

    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&qr_token()),
        Some(EXAMPLE.to_string()),
    )
    .await;

    assert_eq!(reply.status, 500);
    let json = reply.json();
    assert!(json.get("q").is_none());
    assert_eq!(json["error"], "Error procesando matriz");
    assert_eq!(
        json["details"],
        "Error al comunicarse con Stats API: timeout of 300ms exceeded"
    );
    drop(silent);
}

// ============================================================================
// Auth gate
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_token_is_401() {
    let qr = spawn_qr("http://127.0.0.1:9/api/stats".into(), String::new()).await;
    let reply = call("POST", format!("{qr}/api/qr"), None, Some(EXAMPLE.to_string())).await;
    assert_eq!(reply.status, 401);
    assert_eq!(reply.envelope(), ErrorEnvelope::new("Token no proporcionado"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_token_is_403() {
    let qr = spawn_qr("http://127.0.0.1:9/api/stats".into(), String::new()).await;
    for header in ["Bearer", "Bearer not-a-token", "Basic abc.def.ghi"] {
        let reply = call(
            "POST",
            format!("{qr}/api/qr"),
            Some(header.to_string()),
            Some(EXAMPLE.to_string()),
        )
        .await;
        assert_eq!(reply.status, 403, "{header}");
        assert_eq!(
            reply.envelope(),
            ErrorEnvelope::new("Token inválido o expirado")
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expired_token_is_403() {
    let qr = spawn_qr("http://127.0.0.1:9/api/stats".into(), String::new()).await;
    let five_days_ago = jsonwebtoken::get_current_timestamp() - 5 * 86_400;
    let expired = issue_token_at(QR_SECRET, five_days_ago, TOKEN_VALIDITY).unwrap();

    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&expired),
        Some(EXAMPLE.to_string()),
    )
    .await;
    assert_eq!(reply.status, 403);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_token_from_other_service_is_403() {
    let stats = spawn_stats().await;
    let reply = call(
        "POST",
        format!("{stats}/api/stats"),
        bearer(&qr_token()),
        Some(r#"{"q": [[1]], "r": [[1]]}"#.to_string()),
    )
    .await;
    assert_eq!(reply.status, 403);
}

// ============================================================================
// Login, health, malformed bodies
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_token_is_accepted() {
    let stats = spawn_stats().await;
    let login = call("GET", format!("{stats}/api/login"), None, None).await;
    assert_eq!(login.status, 200);
    let token = login.json()["token"].as_str().unwrap().to_string();

    let reply = call(
        "POST",
        format!("{stats}/api/stats"),
        bearer(&token),
        Some(r#"{"q": [[1, 0], [0, 1]], "r": [[2, 3], [0, 4]]}"#.to_string()),
    )
    .await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.json()["average"], 1.375);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_without_secret_is_500() {
    let stats = spawn(build_stats_router(Arc::new(AuthConfig::default()))).await;
    let reply = call("GET", format!("{stats}/api/login"), None, None).await;
    assert_eq!(reply.status, 500);
    assert_eq!(
        reply.envelope(),
        ErrorEnvelope::new("JWT_SECRET no está definido en las variables de entorno")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_endpoints() {
    let stats = spawn_stats().await;
    let qr = spawn_qr(format!("{stats}/api/stats"), stats_credential()).await;
    for (base, service) in [(qr, "qr"), (stats, "stats")] {
        let reply = call("GET", format!("{base}/health"), None, None).await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json()["status"], "healthy");
        assert_eq!(reply.json()["service"], service);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unparseable_body_is_generic_500() {
    let stats = spawn_stats().await;
    let qr = spawn_qr(format!("{stats}/api/stats"), stats_credential()).await;
    let reply = call(
        "POST",
        format!("{qr}/api/qr"),
        bearer(&qr_token()),
        Some("{not json".to_string()),
    )
    .await;
    assert_eq!(reply.status, 500);
    assert_eq!(reply.envelope(), ErrorEnvelope::new("Error interno del servidor"));
}
