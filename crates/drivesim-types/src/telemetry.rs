//! The per-tick telemetry snapshot and its derived warnings.
//!
//! A [`TelemetrySnapshot`] is an immutable, rounded, point-in-time view of
//! the vehicle. It is built fresh on every read -- nothing in it is stored
//! back into the simulation. JSON field names are camelCase to match the
//! dashboard's wire format.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::gear::Gear;

/// A dashboard warning derived from telemetry thresholds.
///
/// Warnings are never stored; they are recomputed from the live values on
/// every snapshot. Their order in [`TelemetrySnapshot::warnings`] is fixed:
/// `HIGH_TEMP`, `LOW_FUEL`, `LOW_BATTERY`, `HIGH_RPM`, filtered to the
/// active subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Warning {
    /// Engine temperature above 105 degrees C.
    HighTemp,
    /// Fuel below 10 percent.
    LowFuel,
    /// Battery below 20 percent.
    LowBattery,
    /// Engine speed above 7000 RPM.
    HighRpm,
}

/// An immutable, rounded view of the vehicle state at one instant.
///
/// Speed, temperature, battery, and fuel are rounded to one decimal.
/// Throttle and brake are reported as a percentage of actuator travel,
/// also to one decimal. RPM is a whole number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Epoch milliseconds at which the snapshot was taken.
    pub timestamp: i64,
    /// Vehicle speed in km/h.
    pub speed: f64,
    /// Engine speed in revolutions per minute.
    pub rpm: i32,
    /// Engine temperature in degrees C.
    pub engine_temp: f64,
    /// Battery charge percentage.
    pub battery: f64,
    /// Fuel level percentage.
    pub fuel: f64,
    /// Throttle position as a percentage of travel.
    pub throttle: f64,
    /// Brake position as a percentage of travel.
    pub brake: f64,
    /// Current gear selector position.
    pub gear: Gear,
    /// Active warnings, in fixed threshold order.
    pub warnings: Vec<Warning>,
}
