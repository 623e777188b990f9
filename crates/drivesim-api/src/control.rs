//! Control REST API handlers for driving the simulated vehicle.
//!
//! These endpoints are the write side of the gateway: they set actuator
//! targets, select gears, and reset the vehicle. No command can fail on
//! intensity -- values are clamped, not rejected -- and every response
//! echoes the value that was actually applied. The one exception is the
//! gear endpoint, which validates its token against the closed gear set
//! and answers HTTP 400 for anything else.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/control/accelerate` | Command a throttle setpoint |
//! | `POST` | `/api/control/brake` | Command a brake setpoint |
//! | `POST` | `/api/control/gear` | Select a gear by token |
//! | `POST` | `/api/control/reset` | Reinitialize the vehicle |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use drivesim_types::Gear;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/control/accelerate` and
/// `POST /api/control/brake`.
#[derive(Debug, serde::Deserialize)]
pub struct IntensityRequest {
    /// Commanded intensity in `[0, 1]`; out-of-range values are clamped.
    /// Defaults to 0.5 when omitted.
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

const fn default_intensity() -> f64 {
    0.5
}

/// Request body for `POST /api/control/gear`.
#[derive(Debug, serde::Deserialize)]
pub struct GearRequest {
    /// Gear token: `P`, `R`, `N`, or `1`-`8` (case-insensitive).
    pub gear: String,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct ControlResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// POST /api/control/accelerate
// ---------------------------------------------------------------------------

/// Command a throttle setpoint.
///
/// The intensity is clamped into `[0, 1]` and approached exponentially
/// over the following ticks. A parked vehicle shifts into first gear so
/// the command takes effect.
pub async fn accelerate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IntensityRequest>,
) -> impl IntoResponse {
    let applied = state.simulator.accelerate(body.intensity);
    Json(serde_json::json!({
        "ok": true,
        "intensity": applied,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/control/brake
// ---------------------------------------------------------------------------

/// Command a brake setpoint.
///
/// The intensity is clamped into `[0, 1]`; the throttle setpoint is
/// cleared so the vehicle eases off power while the brake eases in.
pub async fn brake(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IntensityRequest>,
) -> impl IntoResponse {
    let applied = state.simulator.brake(body.intensity);
    Json(serde_json::json!({
        "ok": true,
        "intensity": applied,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/control/gear
// ---------------------------------------------------------------------------

/// Select a gear by token.
///
/// The token is trimmed and upper-cased before parsing, so `p` and `P`
/// select Park alike. Unknown tokens are rejected with HTTP 400 rather
/// than stored.
pub async fn set_gear(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = body.gear.trim().to_ascii_uppercase();
    let gear = Gear::from_token(&token)?;
    let applied = state.simulator.set_gear(gear);

    Ok(Json(serde_json::json!({
        "ok": true,
        "gear": applied.as_token(),
    })))
}

// ---------------------------------------------------------------------------
// POST /api/control/reset
// ---------------------------------------------------------------------------

/// Reinitialize the vehicle to its start-of-process state.
///
/// Parked, idling, warm, fully fueled and charged; all actuator targets
/// cleared.
pub async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.simulator.reset();
    Json(ControlResponse {
        ok: true,
        message: String::from("Vehicle reset to initial state"),
    })
}
