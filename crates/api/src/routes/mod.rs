pub mod health;
pub mod jobs;
pub mod root;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree.
///
/// ```text
/// POST /text-to-image     submit a generation job
/// GET  /results/{id}      poll a job's status / result URL
/// GET  /health            store connectivity
/// GET  /                  capability listing
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(root::router())
        .merge(jobs::router())
        .merge(health::router())
}
