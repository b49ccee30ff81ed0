//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /health reports a reachable store as healthy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_healthy_when_store_is_reachable() {
    let test = common::build_test_app(None);

    let response = get(test.app.clone(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["storage"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: a store outage degrades health in the body, still 200
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_unhealthy_during_a_store_outage() {
    let test = common::build_test_app(None);
    test.store.set_unavailable(true);

    let response = get(test.app.clone(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert!(json["storage"].as_str().unwrap().contains("unavailable"));

    // Recovery is visible on the next probe.
    test.store.set_unavailable(false);
    let json = body_json(get(test.app.clone(), "/health").await).await;
    assert_eq!(json["status"], "healthy");
}

// ---------------------------------------------------------------------------
// Test: GET / lists the service capabilities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_lists_capabilities() {
    let test = common::build_test_app(None);

    let response = get(test.app.clone(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Welcome to SD3 API");
    assert!(json["endpoints"]["POST /text-to-image"].is_string());
    assert!(json["endpoints"]["GET /results/{id}"].is_string());
    assert!(json["endpoints"]["GET /health"].is_string());
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let test = common::build_test_app(None);

    let response = get(test.app.clone(), "/health").await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");

    // The value should be a valid UUID (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let test = common::build_test_app(None);
    let response = get(test.app.clone(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
