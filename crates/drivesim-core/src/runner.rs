//! The broadcast loop: fixed-interval ticking and telemetry fan-out.
//!
//! This module provides [`run_broadcast_loop`], the async task that is the
//! only driver of simulated time. Once per period it checks the sink's
//! subscriber count; with nobody watching the tick is skipped entirely and
//! the vehicle stays frozen. Otherwise it advances the simulator by one
//! tick, takes a snapshot, and hands it to the [`TelemetrySink`] for
//! delivery.
//!
//! The loop is fatal-free: per-tick failures (serialization, a dead
//! subscriber) are the sink's to log and absorb, and nothing here returns
//! an error. The loop ends only when a stop is requested through the
//! shared [`BroadcastControl`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use drivesim_types::TelemetrySnapshot;
use tracing::{debug, info};

use crate::simulator::Simulator;

/// The transport seam between the broadcast loop and its subscribers.
///
/// The loop knows nothing about how a payload reaches a remote client;
/// it only asks how many subscribers are live and hands over one
/// snapshot per tick. Implementations must serialize the snapshot once
/// and deliver the identical payload to every subscriber, absorbing and
/// logging per-subscriber failures.
pub trait TelemetrySink: Send + Sync {
    /// Number of currently live subscribers.
    fn subscriber_count(&self) -> usize;

    /// Deliver one tick's snapshot to every live subscriber.
    fn publish(&self, snapshot: &TelemetrySnapshot);
}

/// Shared control handle for the broadcast loop.
///
/// Wrapped in `Arc` and shared between the loop task and the shutdown
/// path. The flag is atomic so the loop's per-tick check is lock-free.
#[derive(Debug, Default)]
pub struct BroadcastControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,
}

impl BroadcastControl {
    /// Create a control handle with no stop requested.
    pub const fn new() -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
        }
    }

    /// Request a clean loop stop. The loop exits before its next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

/// Counters describing a finished broadcast loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    /// Ticks that advanced the simulation and published telemetry.
    pub ticks_run: u64,
    /// Ticks skipped because no subscriber was connected.
    pub ticks_skipped: u64,
}

/// Run the broadcast loop until a stop is requested.
///
/// Fires on a fixed period. Each firing either advances the simulation
/// and publishes one snapshot, or -- with zero subscribers -- does
/// nothing at all, so simulated time does not advance while nobody is
/// watching.
///
/// Returns a [`LoopSummary`] for the shutdown log.
pub async fn run_broadcast_loop(
    simulator: &Simulator,
    sink: &dyn TelemetrySink,
    control: &BroadcastControl,
    tick_interval: Duration,
) -> LoopSummary {
    info!(
        interval_ms = u64::try_from(tick_interval.as_millis()).unwrap_or(u64::MAX),
        "Broadcast loop starting"
    );

    let mut summary = LoopSummary {
        ticks_run: 0,
        ticks_skipped: 0,
    };

    loop {
        if control.is_stop_requested() {
            info!(
                ticks_run = summary.ticks_run,
                ticks_skipped = summary.ticks_skipped,
                "Broadcast loop stopped"
            );
            return summary;
        }

        if tick_once(simulator, sink) {
            summary.ticks_run = summary.ticks_run.saturating_add(1);
        } else {
            summary.ticks_skipped = summary.ticks_skipped.saturating_add(1);
        }

        tokio::time::sleep(tick_interval).await;
    }
}

/// Execute one loop firing. Returns `true` if the simulation advanced.
///
/// The update happens-before the snapshot, and both go through the
/// simulator's mutex, so every subscriber receives the same logical
/// tick's data.
fn tick_once(simulator: &Simulator, sink: &dyn TelemetrySink) -> bool {
    let subscribers = sink.subscriber_count();
    if subscribers == 0 {
        debug!("No subscribers connected, skipping tick");
        return false;
    }

    simulator.update();
    let snapshot = simulator.telemetry();
    sink.publish(&snapshot);
    debug!(
        subscribers,
        speed = snapshot.speed,
        rpm = snapshot.rpm,
        gear = %snapshot.gear,
        "Telemetry tick published"
    );
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::rng::SequenceRng;

    /// A sink recording every published snapshot, with a settable
    /// subscriber count.
    struct RecordingSink {
        subscribers: AtomicUsize,
        published: std::sync::Mutex<Vec<TelemetrySnapshot>>,
    }

    impl RecordingSink {
        fn with_subscribers(count: usize) -> Self {
            Self {
                subscribers: AtomicUsize::new(count),
                published: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn published_count(&self) -> usize {
            self.published.lock().map(|p| p.len()).unwrap_or(0)
        }
    }

    impl TelemetrySink for RecordingSink {
        fn subscriber_count(&self) -> usize {
            self.subscribers.load(Ordering::Acquire)
        }

        fn publish(&self, snapshot: &TelemetrySnapshot) {
            if let Ok(mut published) = self.published.lock() {
                published.push(snapshot.clone());
            }
        }
    }

    fn quiet_simulator() -> Simulator {
        Simulator::with_rng(Box::new(SequenceRng::constant(0.98)))
    }

    #[test]
    fn tick_with_subscribers_advances_and_publishes() {
        let sim = quiet_simulator();
        let sink = RecordingSink::with_subscribers(3);
        let _ = sim.accelerate(0.8);

        assert!(tick_once(&sim, &sink));
        assert!(tick_once(&sim, &sink));

        assert_eq!(sink.published_count(), 2);
        // The simulation moved: throttle eased up from zero.
        assert!(sim.telemetry().throttle > 0.0);
    }

    #[test]
    fn tick_without_subscribers_leaves_the_vehicle_frozen() {
        let sim = quiet_simulator();
        let sink = RecordingSink::with_subscribers(0);
        let _ = sim.accelerate(0.8);
        let before = sim.telemetry();

        for _ in 0..10 {
            assert!(!tick_once(&sim, &sink));
        }

        let after = sim.telemetry();
        assert_eq!(sink.published_count(), 0);
        // Nothing but the timestamp may differ.
        assert_eq!(after.speed, before.speed);
        assert_eq!(after.rpm, before.rpm);
        assert_eq!(after.throttle, before.throttle);
        assert_eq!(after.brake, before.brake);
        assert_eq!(after.fuel, before.fuel);
        assert_eq!(after.battery, before.battery);
        assert_eq!(after.engine_temp, before.engine_temp);
        assert_eq!(after.gear, before.gear);
    }

    #[test]
    fn published_snapshot_matches_the_post_update_state() {
        let sim = quiet_simulator();
        let sink = RecordingSink::with_subscribers(1);
        let _ = sim.accelerate(1.0);

        assert!(tick_once(&sim, &sink));

        let published = sink.published.lock().unwrap();
        let snapshot = published.first().unwrap();
        let current = sim.telemetry();
        assert_eq!(snapshot.speed, current.speed);
        assert_eq!(snapshot.rpm, current.rpm);
        assert_eq!(snapshot.gear, current.gear);
    }

    #[tokio::test]
    async fn loop_stops_on_request_and_reports_counts() {
        let sim = Arc::new(quiet_simulator());
        let sink = Arc::new(RecordingSink::with_subscribers(1));
        let control = Arc::new(BroadcastControl::new());

        let handle = {
            let sim = Arc::clone(&sim);
            let sink = Arc::clone(&sink);
            let control = Arc::clone(&control);
            tokio::spawn(async move {
                run_broadcast_loop(&sim, sink.as_ref(), &control, Duration::from_millis(1)).await
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        control.request_stop();

        let summary = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert!(summary.ticks_run > 0);
        assert_eq!(summary.ticks_skipped, 0);
        assert_eq!(sink.published_count(), usize::try_from(summary.ticks_run).unwrap_or(usize::MAX));
    }

    #[tokio::test]
    async fn loop_skips_while_nobody_is_watching() {
        let sim = Arc::new(quiet_simulator());
        let sink = Arc::new(RecordingSink::with_subscribers(0));
        let control = Arc::new(BroadcastControl::new());

        let handle = {
            let sim = Arc::clone(&sim);
            let sink = Arc::clone(&sink);
            let control = Arc::clone(&control);
            tokio::spawn(async move {
                run_broadcast_loop(&sim, sink.as_ref(), &control, Duration::from_millis(1)).await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        control.request_stop();

        let summary = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.ticks_run, 0);
        assert!(summary.ticks_skipped > 0);
        assert_eq!(sim.telemetry().speed, 0.0);
    }
}
