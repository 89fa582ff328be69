use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store does not answer.
    pub status: &'static str,
    pub version: &'static str,
    /// Result of a `SELECT 1` against the workspace database.
    pub db_healthy: bool,
}

/// Reports liveness and store reachability. Never fails; a dead store
/// shows up as `degraded`.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state
        .run(|store| Ok(store.ping()))
        .await
        .unwrap_or(false);

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Liveness route, mounted beside `/api` rather than under it.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
