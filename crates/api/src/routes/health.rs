use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `up`, `down`, or `none` when running without a database.
    pub database: &'static str,
    /// Live WebSocket sessions.
    pub sessions: usize,
    /// Age in seconds of the longest-lived session, if any.
    pub oldest_session_secs: Option<i64>,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.pool {
        Some(pool) => {
            if roofwatch_db::health_check(pool).await.is_ok() {
                "up"
            } else {
                "down"
            }
        }
        None => "none",
    };
    let status = if database == "down" { "degraded" } else { "ok" };
    let oldest_session_secs = state
        .ws_manager
        .oldest_connected_at()
        .await
        .map(|at| (chrono::Utc::now() - at).num_seconds());

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        sessions: state.ws_manager.connection_count().await,
        oldest_session_secs,
    })
}

/// Mount health check routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
