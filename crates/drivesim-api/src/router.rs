//! Axum router construction for the gateway API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{control, handlers, ws};

/// Build the complete Axum router for the gateway server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/telemetry` -- `WebSocket` snapshot stream
/// - `GET /api/telemetry` -- current snapshot
/// - `POST /api/control/accelerate` -- throttle command
/// - `POST /api/control/brake` -- brake command
/// - `POST /api/control/gear` -- gear selection
/// - `POST /api/control/reset` -- vehicle reset
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/telemetry", get(ws::ws_telemetry))
        // REST API
        .route("/api/telemetry", get(handlers::get_telemetry))
        .route("/api/control/accelerate", post(control::accelerate))
        .route("/api/control/brake", post(control::brake))
        .route("/api/control/gear", post(control::set_gear))
        .route("/api/control/reset", post(control::reset))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
