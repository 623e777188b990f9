//! Read endpoint handlers for the gateway server.
//!
//! Reads go straight to the simulator; its internal mutex serializes
//! them against the broadcast tick, so a snapshot never mixes fields
//! from two different ticks.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/telemetry` | Current telemetry snapshot |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing live gauge values and API links.
///
/// This is the placeholder dashboard until the frontend consumes the
/// generated TypeScript bindings.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.simulator.telemetry();
    let speed = snapshot.speed;
    let rpm = snapshot.rpm;
    let gear = snapshot.gear.as_token();
    let fuel = snapshot.fuel;
    let battery = snapshot.battery;
    let temp = snapshot.engine_temp;
    let subscribers = state.subscriber_count();
    let warnings = if snapshot.warnings.is_empty() {
        String::from("none")
    } else {
        snapshot
            .warnings
            .iter()
            .map(|w| format!("{w:?}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Drivesim Telemetry</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Drivesim Telemetry</h1>
    <p class="subtitle">Simulated vehicle telemetry gateway</p>

    <p>Status: <span class="status">RUNNING</span> -- {subscribers} live subscriber(s)</p>

    <div>
        <div class="metric">
            <div class="label">Speed (km/h)</div>
            <div class="value">{speed}</div>
        </div>
        <div class="metric">
            <div class="label">RPM</div>
            <div class="value">{rpm}</div>
        </div>
        <div class="metric">
            <div class="label">Gear</div>
            <div class="value">{gear}</div>
        </div>
        <div class="metric">
            <div class="label">Fuel (%)</div>
            <div class="value">{fuel}</div>
        </div>
        <div class="metric">
            <div class="label">Battery (%)</div>
            <div class="value">{battery}</div>
        </div>
        <div class="metric">
            <div class="label">Engine (&deg;C)</div>
            <div class="value">{temp}</div>
        </div>
    </div>

    <p>Warnings: {warnings}</p>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/telemetry">/api/telemetry</a> -- Current snapshot</li>
        <li>POST /api/control/accelerate -- {{"intensity": 0.0-1.0}}</li>
        <li>POST /api/control/brake -- {{"intensity": 0.0-1.0}}</li>
        <li>POST /api/control/gear -- {{"gear": "P|R|N|1-8"}}</li>
        <li>POST /api/control/reset -- Reinitialize the vehicle</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/telemetry</code> -- Live snapshot stream (one frame per tick)</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/telemetry -- current snapshot
// ---------------------------------------------------------------------------

/// Return the current telemetry snapshot.
///
/// Pure read: rounding and warning derivation happen at snapshot time,
/// nothing is mutated.
pub async fn get_telemetry(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.simulator.telemetry())
}
