//! Integration tests for the gateway API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use drivesim_api::router::build_router;
use drivesim_api::state::AppState;
use drivesim_core::rng::SequenceRng;
use drivesim_core::simulator::Simulator;
use serde_json::Value;
use tower::ServiceExt;

/// Build an app state around a deterministic simulator whose autonomous
/// behavior never fires.
fn make_test_state() -> Arc<AppState> {
    let simulator = Arc::new(Simulator::with_rng(Box::new(SequenceRng::constant(0.98))));
    Arc::new(AppState::new(simulator))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_get_telemetry_initial_snapshot() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/telemetry").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["speed"], 0.0);
    assert_eq!(json["rpm"], 800);
    assert_eq!(json["engineTemp"], 90.0);
    assert_eq!(json["battery"], 100.0);
    assert_eq!(json["fuel"], 100.0);
    assert_eq!(json["throttle"], 0.0);
    assert_eq!(json["brake"], 0.0);
    assert_eq!(json["gear"], "P");
    assert_eq!(json["warnings"], serde_json::json!([]));
    assert!(json["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_accelerate_defaults_to_half_intensity() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(json_post("/api/control/accelerate", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["intensity"], 0.5);
}

#[tokio::test]
async fn test_accelerate_clamps_out_of_range_intensity() {
    let state = make_test_state();

    let response = build_router(Arc::clone(&state))
        .oneshot(json_post("/api/control/accelerate", r#"{"intensity": 5.0}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["intensity"], 1.0);

    let response = build_router(state)
        .oneshot(json_post("/api/control/accelerate", r#"{"intensity": -1.0}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["intensity"], 0.0);
}

#[tokio::test]
async fn test_accelerate_from_park_selects_first_gear() {
    let state = make_test_state();

    let response = build_router(Arc::clone(&state))
        .oneshot(json_post("/api/control/accelerate", r#"{"intensity": 0.6}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(Request::get("/api/telemetry").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["gear"], "1");
}

#[tokio::test]
async fn test_brake_echoes_the_applied_value() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(json_post("/api/control/brake", r#"{"intensity": 0.7}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["intensity"], 0.7);
}

#[tokio::test]
async fn test_gear_token_is_case_normalized() {
    let state = make_test_state();

    let response = build_router(Arc::clone(&state))
        .oneshot(json_post("/api/control/gear", r#"{"gear": "r"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["gear"], "R");

    let response = build_router(state)
        .oneshot(Request::get("/api/telemetry").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["gear"], "R");
}

#[tokio::test]
async fn test_invalid_gear_token_is_rejected() {
    let state = make_test_state();

    let response = build_router(Arc::clone(&state))
        .oneshot(json_post("/api/control/gear", r#"{"gear": "D"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("gear"));

    // The vehicle still reports its previous gear.
    let response = build_router(state)
        .oneshot(Request::get("/api/telemetry").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["gear"], "P");
}

#[tokio::test]
async fn test_reset_restores_the_initial_snapshot() {
    let state = make_test_state();

    // Drive a little first.
    let response = build_router(Arc::clone(&state))
        .oneshot(json_post("/api/control/accelerate", r#"{"intensity": 0.9}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    for _ in 0..50 {
        state.simulator.update();
    }
    assert!(state.simulator.telemetry().speed > 0.0);

    let response = build_router(Arc::clone(&state))
        .oneshot(json_post("/api/control/reset", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);

    let response = build_router(state)
        .oneshot(Request::get("/api/telemetry").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["speed"], 0.0);
    assert_eq!(json["rpm"], 800);
    assert_eq!(json["gear"], "P");
    assert_eq!(json["fuel"], 100.0);
    assert_eq!(json["battery"], 100.0);
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
