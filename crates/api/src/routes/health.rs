use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
///
/// Degradation is reported in the body, not the status code; monitoring
/// reads the `status` field.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status (`healthy` / `unhealthy`).
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `ok`, or the store probe's diagnostic.
    pub storage: String,
}

/// GET /health -- returns service and result-store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.orchestrator.health().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            storage: "ok".into(),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Store health probe failed");
            Json(HealthResponse {
                status: "unhealthy",
                version: env!("CARGO_PKG_VERSION"),
                storage: e.to_string(),
            })
        }
    }
}

/// Mount the health check route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
