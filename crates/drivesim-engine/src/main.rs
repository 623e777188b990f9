//! Service binary for the drivesim vehicle telemetry simulator.
//!
//! This is the main entry point that wires together the simulator, the
//! broadcast loop, and the HTTP/WebSocket gateway. It loads
//! configuration, initializes all subsystems, and runs the broadcast
//! loop until the process receives Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `drivesim.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the simulator (seeded if configured)
//! 4. Start the gateway server on a background task
//! 5. Install the Ctrl-C handler
//! 6. Run the broadcast loop
//! 7. Log the result

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use drivesim_api::startup::spawn_gateway;
use drivesim_api::state::AppState;
use drivesim_core::config::ServiceConfig;
use drivesim_core::runner::{self, BroadcastControl};
use drivesim_core::simulator::Simulator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the drivesim service.
///
/// Initializes all subsystems and runs the broadcast loop. Returns an
/// error if any bootstrap step fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration (before logging, so the configured level can
    //    serve as the fallback filter).
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("drivesim-engine starting");
    info!(
        host = config.gateway.host,
        port = config.gateway.port,
        tick_interval_ms = config.simulation.tick_interval_ms,
        seed = config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Create the simulator.
    let simulator = Arc::new(
        config
            .simulation
            .seed
            .map_or_else(Simulator::new, Simulator::seeded),
    );
    info!("Simulator initialized");

    // 4. Start the gateway server.
    let state = Arc::new(AppState::new(Arc::clone(&simulator)));
    let _gateway_handle = spawn_gateway(
        &config.gateway.host,
        config.gateway.port,
        Arc::clone(&state),
    )
    .await
    .map_err(EngineError::from)?;
    info!(port = config.gateway.port, "Gateway server started");

    // 5. Install the Ctrl-C handler.
    let control = Arc::new(BroadcastControl::new());
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping broadcast loop");
                control.request_stop();
            }
        });
    }

    // 6. Run the broadcast loop until stopped.
    let tick_interval = Duration::from_millis(config.simulation.tick_interval_ms);
    let summary =
        runner::run_broadcast_loop(&simulator, state.as_ref(), &control, tick_interval).await;

    // 7. Log the result.
    info!(
        ticks_run = summary.ticks_run,
        ticks_skipped = summary.ticks_skipped,
        "drivesim-engine shutdown complete"
    );

    Ok(())
}

/// Load the service configuration from `drivesim.yaml`.
///
/// Looks for the config file relative to the current working directory
/// and falls back to defaults when it is absent.
fn load_config() -> Result<ServiceConfig, EngineError> {
    let config_path = Path::new("drivesim.yaml");
    if config_path.exists() {
        let config = ServiceConfig::from_file(config_path)?;
        Ok(config)
    } else {
        Ok(ServiceConfig::default())
    }
}
