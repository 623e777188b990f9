//! The raw vehicle state and its per-tick physics.
//!
//! [`VehicleState`] is the single mutable record of the simulated vehicle.
//! One call to [`VehicleState::step`] advances it by one discrete tick
//! (nominally 100 ms of simulated time): actuators ease toward their
//! targets, the autonomous behavior may pick new targets, and speed, RPM,
//! temperature, fuel, and battery follow.
//!
//! Every bounded field is clamped back into range before the step
//! returns; no input can push the state outside its invariants.
//!
//! This module is deliberately free of locking and I/O -- the
//! [`Simulator`](crate::simulator::Simulator) facade owns concurrency.

use drivesim_types::{Gear, TelemetrySnapshot, Warning};

use crate::rng::DriveRng;

/// Top speed in km/h.
pub const MAX_SPEED_KMH: f64 = 280.0;

/// Redline engine speed in RPM.
pub const MAX_RPM: f64 = 8000.0;

/// Idle engine speed in RPM.
pub const IDLE_RPM: f64 = 800.0;

/// Nominal engine temperature in degrees C, toward which the coolant
/// system relaxes.
const NOMINAL_TEMP_C: f64 = 90.0;

/// Fraction of the remaining distance to target an actuator covers per tick.
const ACTUATOR_EASE: f64 = 0.1;

/// The mutable state of the simulated vehicle.
///
/// Owned exclusively by the simulator; constructed once per instance and
/// reinitialized in place on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    /// Vehicle speed in km/h, within `[0, MAX_SPEED_KMH]`.
    pub speed_kmh: f64,
    /// Engine speed in RPM, within `[IDLE_RPM, MAX_RPM]`.
    pub rpm: f64,
    /// Engine temperature in degrees C, within `[70, 120]`.
    pub engine_temp_c: f64,
    /// Battery charge percentage, within `[0, 100]`.
    pub battery_pct: f64,
    /// Fuel level percentage, within `[0, 100]`.
    pub fuel_pct: f64,
    /// Smoothed throttle position, within `[0, 1]`.
    pub throttle: f64,
    /// Smoothed brake position, within `[0, 1]`.
    pub brake: f64,
    /// Commanded throttle setpoint, approached exponentially.
    pub target_throttle: f64,
    /// Commanded brake setpoint, approached exponentially.
    pub target_brake: f64,
    /// Current gear selector position.
    pub gear: Gear,
}

impl VehicleState {
    /// Create a vehicle at rest: parked, idling, warm, fully fueled and
    /// charged.
    pub const fn new() -> Self {
        Self {
            speed_kmh: 0.0,
            rpm: IDLE_RPM,
            engine_temp_c: NOMINAL_TEMP_C,
            battery_pct: 100.0,
            fuel_pct: 100.0,
            throttle: 0.0,
            brake: 0.0,
            target_throttle: 0.0,
            target_brake: 0.0,
            gear: Gear::Park,
        }
    }

    /// Reinitialize all fields to their start-of-process values.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the vehicle by one tick.
    ///
    /// The phases run in a fixed order: actuator smoothing, autonomous
    /// behavior, longitudinal dynamics, RPM, temperature, fuel, battery,
    /// and finally the RPM-driven auto-shift.
    pub fn step(&mut self, rng: &mut dyn DriveRng) {
        self.smooth_actuators();
        self.auto_behavior(rng);
        self.apply_longitudinal();
        self.update_rpm(rng);
        self.update_temperature();
        self.update_fuel();
        self.update_battery();
        self.auto_shift();
    }

    /// Command a throttle setpoint, clearing the brake setpoint.
    ///
    /// Intensity is clamped into `[0, 1]`; the applied value is returned.
    /// A parked vehicle shifts into first so the command can take effect.
    pub fn command_throttle(&mut self, intensity: f64) -> f64 {
        let applied = intensity.clamp(0.0, 1.0);
        self.target_throttle = applied;
        self.target_brake = 0.0;
        if self.gear == Gear::Park {
            self.gear = Gear::First;
        }
        applied
    }

    /// Command a brake setpoint, clearing the throttle setpoint.
    ///
    /// Intensity is clamped into `[0, 1]`; the applied value is returned.
    pub fn command_brake(&mut self, intensity: f64) -> f64 {
        let applied = intensity.clamp(0.0, 1.0);
        self.target_brake = applied;
        self.target_throttle = 0.0;
        applied
    }

    /// Build the rounded telemetry snapshot for this state.
    ///
    /// Warnings are recomputed from the live values on every call.
    pub fn telemetry(&self, timestamp: i64) -> TelemetrySnapshot {
        #[allow(clippy::cast_possible_truncation)]
        let rpm = self.rpm.round() as i32;
        TelemetrySnapshot {
            timestamp,
            speed: round1(self.speed_kmh),
            rpm,
            engine_temp: round1(self.engine_temp_c),
            battery: round1(self.battery_pct),
            fuel: round1(self.fuel_pct),
            throttle: round1(self.throttle * 100.0),
            brake: round1(self.brake * 100.0),
            gear: self.gear,
            warnings: self.warnings(),
        }
    }

    /// Derive the active warnings in their fixed threshold order.
    fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.engine_temp_c > 105.0 {
            warnings.push(Warning::HighTemp);
        }
        if self.fuel_pct < 10.0 {
            warnings.push(Warning::LowFuel);
        }
        if self.battery_pct < 20.0 {
            warnings.push(Warning::LowBattery);
        }
        if self.rpm > 7000.0 {
            warnings.push(Warning::HighRpm);
        }
        warnings
    }

    /// Ease each actuator a fixed fraction of the way to its setpoint.
    ///
    /// The approach is exponential, so the actuator never reaches the
    /// target exactly and both actuators can be transiently nonzero
    /// while one eases out and the other eases in.
    const fn smooth_actuators(&mut self) {
        self.throttle += (self.target_throttle - self.throttle) * ACTUATOR_EASE;
        self.brake += (self.target_brake - self.brake) * ACTUATOR_EASE;
    }

    /// The unattended-vehicle behavior: occasionally pick new actuator
    /// targets so the state keeps drifting through driving phases.
    fn auto_behavior(&mut self, rng: &mut dyn DriveRng) {
        if rng.chance(0.02) {
            if rng.chance(0.7) {
                self.target_throttle = rng.range(0.2, 0.8);
                self.target_brake = 0.0;
                if self.gear == Gear::Park {
                    self.gear = Gear::First;
                }
            } else {
                self.target_throttle = 0.0;
                self.target_brake = rng.range(0.2, 0.7);
            }
        }
        if rng.chance(0.01) {
            self.target_throttle = rng.range(0.0, 0.3);
            self.target_brake = 0.0;
        }
    }

    /// Apply throttle, brake, and drag to the speed.
    ///
    /// In Park or Neutral the drivetrain is decoupled and speed decays
    /// geometrically, snapping to zero below 0.1 km/h.
    fn apply_longitudinal(&mut self) {
        if self.gear.is_drive() {
            if self.throttle > 0.0 {
                self.speed_kmh = (self.speed_kmh + self.throttle * 0.8).min(MAX_SPEED_KMH);
            }
            if self.brake > 0.0 {
                self.speed_kmh = (self.speed_kmh - self.brake * 1.2).max(0.0);
            }
            if self.throttle < 0.1 && self.brake < 0.1 && self.speed_kmh > 0.0 {
                self.speed_kmh = (self.speed_kmh - 0.2).max(0.0);
            }
        } else {
            self.speed_kmh *= 0.95;
            if self.speed_kmh < 0.1 {
                self.speed_kmh = 0.0;
            }
        }
    }

    /// Move RPM a tenth of the way toward its target, with jitter.
    ///
    /// The target follows the throttle when the drivetrain is decoupled
    /// and follows speed and gear ratio otherwise.
    fn update_rpm(&mut self, rng: &mut dyn DriveRng) {
        let target = self.gear.ratio_number().map_or_else(
            || IDLE_RPM + self.throttle * 2000.0,
            |g| IDLE_RPM + self.speed_kmh * 25.0 * f64::from(9_u8.saturating_sub(g)) / 8.0,
        );
        let jitter = rng.range(-50.0, 50.0);
        self.rpm = (self.rpm + (target - self.rpm) / 10.0 + jitter).clamp(IDLE_RPM, MAX_RPM);
    }

    /// Balance generated heat against airflow cooling, then relax toward
    /// the nominal operating temperature.
    fn update_temperature(&mut self) {
        let heat = (self.rpm / MAX_RPM) * 0.5 + self.throttle * 0.3;
        let cooling = (self.speed_kmh / MAX_SPEED_KMH) * 0.3 + 0.1;
        self.engine_temp_c += (heat - cooling) * 0.5;
        self.engine_temp_c += (NOMINAL_TEMP_C - self.engine_temp_c) * 0.01;
        self.engine_temp_c = self.engine_temp_c.clamp(70.0, 120.0);
    }

    /// Burn fuel while moving under engine power.
    fn update_fuel(&mut self) {
        if self.gear.is_drive() && self.speed_kmh > 0.0 {
            let burn = self.rpm / MAX_RPM * 0.005 + self.throttle * 0.002;
            self.fuel_pct = (self.fuel_pct - burn).max(0.0);
        }
    }

    /// Charge from the alternator above idle, trickle-discharge at idle.
    fn update_battery(&mut self) {
        if self.rpm > IDLE_RPM {
            self.battery_pct = (self.battery_pct + 0.005).min(100.0);
        } else {
            self.battery_pct = (self.battery_pct - 0.001).max(0.0);
        }
    }

    /// Shift up past 6000 RPM and down below 1500 RPM.
    ///
    /// Only forward gears participate; P, R, and N never auto-shift.
    fn auto_shift(&mut self) {
        let Some(current) = self.gear.number() else {
            return;
        };
        if self.rpm > 6000.0 && current < 8 {
            if let Some(next) = Gear::from_number(current.saturating_add(1)) {
                self.gear = next;
            }
        } else if self.rpm < 1500.0 && current > 1 {
            if let Some(next) = Gear::from_number(current.saturating_sub(1)) {
                self.gear = next;
            }
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a value to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
