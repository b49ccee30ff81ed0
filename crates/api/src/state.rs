use std::sync::Arc;

use sd3_pipeline::JobOrchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Job lifecycle coordinator (submission, status, health).
    pub orchestrator: Arc<JobOrchestrator>,
}
