use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Static capability listing served at the root.
#[derive(Serialize)]
pub struct CapabilityListing {
    pub message: &'static str,
    pub endpoints: EndpointListing,
}

#[derive(Serialize)]
pub struct EndpointListing {
    #[serde(rename = "POST /text-to-image")]
    pub submit: &'static str,
    #[serde(rename = "GET /results/{id}")]
    pub results: &'static str,
    #[serde(rename = "GET /health")]
    pub health: &'static str,
}

/// GET / -- what this service can do.
async fn root() -> Json<CapabilityListing> {
    Json(CapabilityListing {
        message: "Welcome to SD3 API",
        endpoints: EndpointListing {
            submit: "Submit a text-to-image generation request",
            results: "Get results for a specific job",
            health: "Health check",
        },
    })
}

/// Mount the root route.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}
