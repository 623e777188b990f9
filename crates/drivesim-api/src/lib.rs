//! Telemetry gateway for the drivesim vehicle simulator.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/telemetry`) for real-time snapshot
//!   streaming via [`tokio::sync::broadcast`]
//! - **REST read endpoint** (`/api/telemetry`) for polling the current
//!   snapshot
//! - **Control REST endpoints** (`/api/control/*`) for accelerate, brake,
//!   gear selection, and reset
//! - **Minimal HTML dashboard** (`GET /`) showing live gauge values and
//!   links to the API endpoints
//!
//! # Architecture
//!
//! The gateway holds an `Arc` of the simulator and a broadcast channel.
//! The broadcast loop (in `drivesim-core`) publishes each tick's snapshot
//! through the [`TelemetrySink`] implementation on [`AppState`], which
//! serializes it exactly once; every connected `WebSocket` client receives
//! the identical payload. Control and read handlers call the simulator
//! directly -- its internal mutex serializes them against the tick.
//!
//! [`TelemetrySink`]: drivesim_core::runner::TelemetrySink
//! [`AppState`]: state::AppState

pub mod control;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
