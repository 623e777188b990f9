//! Shared application state for the gateway server.
//!
//! [`AppState`] holds the broadcast channel for serialized telemetry
//! frames and a handle to the simulator. Handlers read and control the
//! vehicle through the simulator directly; the broadcast loop publishes
//! through the [`TelemetrySink`] implementation here.

use std::sync::Arc;

use drivesim_core::runner::TelemetrySink;
use drivesim_core::simulator::Simulator;
use drivesim_types::TelemetrySnapshot;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Capacity of the broadcast channel for telemetry frames.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest frame.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// broadcast sender carries each tick's snapshot serialized exactly once,
/// so every `WebSocket` client receives the identical payload.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for serialized telemetry frames.
    pub tx: broadcast::Sender<String>,
    /// The simulated vehicle.
    pub simulator: Arc<Simulator>,
}

impl AppState {
    /// Create the application state around an existing simulator.
    pub fn new(simulator: Arc<Simulator>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx, simulator }
    }

    /// Subscribe to the telemetry broadcast channel.
    ///
    /// Returns a receiver that will yield one serialized frame per
    /// broadcast tick for as long as it is held.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Publish a serialized frame to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, payload: String) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(payload).unwrap_or(0)
    }

    /// Number of currently connected `WebSocket` subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl TelemetrySink for AppState {
    fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn publish(&self, snapshot: &TelemetrySnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(payload) => {
                let receivers = self.broadcast(payload);
                debug!(receivers, "Telemetry frame broadcast");
            }
            Err(e) => {
                // A tick that cannot be encoded is dropped; the loop
                // carries on and the next tick tries again.
                warn!(error = %e, "Failed to serialize telemetry frame");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use drivesim_core::rng::SequenceRng;

    use super::*;

    fn make_state() -> AppState {
        let simulator = Arc::new(Simulator::with_rng(Box::new(SequenceRng::constant(0.98))));
        AppState::new(simulator)
    }

    #[tokio::test]
    async fn subscriber_count_tracks_receivers() {
        let state = make_state();
        assert_eq!(state.subscriber_count(), 0);

        let rx = state.subscribe();
        assert_eq!(state.subscriber_count(), 1);
        let rx2 = state.subscribe();
        assert_eq!(state.subscriber_count(), 2);

        drop(rx);
        drop(rx2);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn publish_delivers_the_identical_payload_to_every_subscriber() {
        let state = make_state();
        let mut rx_a = state.subscribe();
        let mut rx_b = state.subscribe();

        let snapshot = state.simulator.telemetry();
        TelemetrySink::publish(&state, &snapshot);

        let payload_a = rx_a.recv().await.unwrap();
        let payload_b = rx_b.recv().await.unwrap();
        assert_eq!(payload_a, payload_b);

        // The payload is the snapshot, serialized once.
        let decoded: TelemetrySnapshot = serde_json::from_str(&payload_a).unwrap();
        assert_eq!(decoded.gear, snapshot.gear);
        assert_eq!(decoded.rpm, snapshot.rpm);
    }

    #[test]
    fn broadcast_without_subscribers_is_not_an_error() {
        let state = make_state();
        let receivers = state.broadcast(String::from("{}"));
        assert_eq!(receivers, 0);
    }
}
