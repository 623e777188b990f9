//! The simulator facade: serialized access to one vehicle.
//!
//! [`Simulator`] owns a single [`VehicleState`] plus its random source
//! behind one mutex. Every public operation -- update, telemetry read,
//! control command, reset -- holds the lock for its full duration, so no
//! caller ever observes a half-applied tick and within a broadcast cycle
//! the update happens-before the snapshot that reports it.
//!
//! Lock granularity is deliberately whole-state: the state is small, the
//! tick rate is low, and field-level locking would reintroduce torn
//! reads.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use drivesim_types::{Gear, TelemetrySnapshot};

use crate::rng::{DriveRng, SystemRng};
use crate::vehicle::VehicleState;

/// Everything guarded by the simulator's mutex.
struct Inner {
    /// The vehicle being simulated.
    vehicle: VehicleState,
    /// Random source feeding the autonomous behavior and RPM jitter.
    rng: Box<dyn DriveRng>,
}

/// A single simulated vehicle with serialized, atomic operations.
///
/// Construct one per vehicle; there is no process-wide instance. Clone-free
/// sharing goes through `Arc<Simulator>`.
pub struct Simulator {
    inner: Mutex<Inner>,
}

impl Simulator {
    /// Create a simulator with entropy-seeded randomness.
    pub fn new() -> Self {
        Self::with_rng(Box::new(SystemRng::new()))
    }

    /// Create a simulator whose random source is seeded for a
    /// reproducible-in-distribution run.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Box::new(SystemRng::seeded(seed)))
    }

    /// Create a simulator with an explicit random source.
    ///
    /// Tests inject a [`SequenceRng`](crate::rng::SequenceRng) here to pin
    /// down exact trajectories.
    pub fn with_rng(rng: Box<dyn DriveRng>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                vehicle: VehicleState::new(),
                rng,
            }),
        }
    }

    /// Acquire the state lock.
    ///
    /// A poisoned mutex means a panic unwound while holding the lock;
    /// the vehicle data itself is still structurally valid (every field
    /// is a plain value), so recover the guard rather than propagate.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance the vehicle by one tick.
    pub fn update(&self) {
        let mut inner = self.lock();
        let Inner { vehicle, rng } = &mut *inner;
        vehicle.step(rng.as_mut());
    }

    /// Build a telemetry snapshot of the current state.
    ///
    /// Read-only; the timestamp is taken while the lock is held so the
    /// snapshot is internally consistent.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        let inner = self.lock();
        inner.vehicle.telemetry(Utc::now().timestamp_millis())
    }

    /// Command a throttle setpoint.
    ///
    /// Intensity is clamped into `[0, 1]` and the applied value is
    /// returned. A parked vehicle shifts into first gear.
    pub fn accelerate(&self, intensity: f64) -> f64 {
        self.lock().vehicle.command_throttle(intensity)
    }

    /// Command a brake setpoint.
    ///
    /// Intensity is clamped into `[0, 1]` and the applied value is
    /// returned.
    pub fn brake(&self, intensity: f64) -> f64 {
        self.lock().vehicle.command_brake(intensity)
    }

    /// Select a gear directly.
    ///
    /// Only typed [`Gear`] values are accepted; token parsing and
    /// rejection of unknown tokens happen at the API boundary. Returns
    /// the applied gear.
    pub fn set_gear(&self, gear: Gear) -> Gear {
        self.lock().vehicle.gear = gear;
        gear
    }

    /// Reinitialize the vehicle to its start-of-process state.
    pub fn reset(&self) {
        self.lock().vehicle.reset();
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator").finish_non_exhaustive()
    }
}
