//! Shared fixtures for the API integration tests: a stub generator, a
//! memory-backed store, and request/response helpers.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use image::RgbImage;
use tower::ServiceExt;

use sd3_api::config::ServerConfig;
use sd3_api::router::build_app_router;
use sd3_api::state::AppState;
use sd3_core::{JobId, JobRegistry};
use sd3_pipeline::JobOrchestrator;
use sd3_storage::{MemoryResultStore, ResultStore};
use sd3_torchserve::{ImageGenerator, InferenceError};

pub const TEST_PREFIX: &str = "sd3-outputs";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        torchserve_url: "http://localhost:8080/predictions/sd3".to_string(),
        s3_bucket: "test-bucket".to_string(),
        s3_prefix: TEST_PREFIX.to_string(),
        s3_force_path_style: true,
    }
}

/// Stand-in generator: a small solid image, or a fixed endpoint failure.
pub struct StubGenerator {
    pub fail_with: Option<&'static str>,
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<RgbImage, InferenceError> {
        if let Some(body) = self.fail_with {
            return Err(InferenceError::Endpoint {
                status: 503,
                body: body.into(),
            });
        }
        Ok(RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30])))
    }
}

/// A fully wired application plus handles on its moving parts.
pub struct TestApp {
    pub app: Router,
    pub registry: Arc<JobRegistry>,
    pub store: Arc<MemoryResultStore>,
}

/// Build the application router exactly as production does, backed by the
/// memory store and a stub generator.
pub fn build_test_app(fail_with: Option<&'static str>) -> TestApp {
    let config = test_config();
    let registry = Arc::new(JobRegistry::new());
    let store = Arc::new(MemoryResultStore::new(TEST_PREFIX));

    let orchestrator = Arc::new(JobOrchestrator::new(
        Arc::clone(&registry),
        Arc::new(StubGenerator { fail_with }),
        Arc::clone(&store) as Arc<dyn ResultStore>,
        TEST_PREFIX,
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        orchestrator,
    };

    TestApp {
        app: build_app_router(state, &config),
        registry,
        store,
    }
}

/// Fire a GET request through the full middleware stack.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Fire a urlencoded-form POST request through the full middleware stack.
pub async fn post_form(app: Router, uri: &str, body: &'static str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// Poll the registry until the job leaves `Pending`.
pub async fn wait_for_terminal(registry: &JobRegistry, job_id: JobId) {
    for _ in 0..500 {
        if let Some(job) = registry.get(job_id).await {
            if job.state.is_terminal() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}
