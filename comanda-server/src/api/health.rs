//! Health check routes
//!
//! | Path | Purpose |
//! |------|---------|
//! | /health | quick status + version |
//! | /health/detailed | uptime + per-component checks |
//! | /health/readiness | 200 when the database answers, 503 otherwise |
//! | /health/liveness | 200 while the process runs |

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;

use crate::core::ServerState;
use crate::utils::{AppResponse, ok};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed))
        .route("/health/readiness", get(readiness))
        .route("/health/liveness", get(liveness))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

#[derive(Serialize)]
struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: i64,
    checks: HealthChecks,
}

#[derive(Serialize)]
struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn health(State(state): State<ServerState>) -> Json<AppResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

async fn detailed(State(state): State<ServerState>) -> Json<AppResponse<DetailedHealthResponse>> {
    let database = match ping_database(&state).await {
        Ok(latency_ms) => CheckResult {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        },
        Err(message) => CheckResult {
            status: "error",
            latency_ms: None,
            message: Some(message),
        },
    };

    let status = if database.status == "ok" { "ok" } else { "degraded" };
    ok(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        checks: HealthChecks { database },
    })
}

/// Readiness gates on the database actually answering
async fn readiness(State(state): State<ServerState>) -> StatusCode {
    match ping_database(&state).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn liveness() -> StatusCode {
    StatusCode::OK
}

async fn ping_database(state: &ServerState) -> Result<u64, String> {
    let start = Instant::now();
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(|e| e.to_string())?;
    Ok(start.elapsed().as_millis() as u64)
}
