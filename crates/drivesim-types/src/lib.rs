//! Shared type definitions for the drivesim telemetry service.
//!
//! This crate is the single source of truth for every type that crosses the
//! wire between the simulator and its clients. Types defined here flow
//! downstream to `TypeScript` via `ts-rs` for the dashboard frontend.
//!
//! # Modules
//!
//! - [`gear`] -- The typed gear selector and its token parsing.
//! - [`telemetry`] -- The per-tick telemetry snapshot and derived warnings.

pub mod gear;
pub mod telemetry;

// Re-export all public types at crate root for convenience.
pub use gear::{Gear, GearParseError};
pub use telemetry::{TelemetrySnapshot, Warning};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::gear::Gear::export_all();
        let _ = crate::telemetry::Warning::export_all();
        let _ = crate::telemetry::TelemetrySnapshot::export_all();
    }
}
