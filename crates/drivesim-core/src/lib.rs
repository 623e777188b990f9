//! Vehicle state machine, tick update cycle, and broadcast runner.
//!
//! This crate owns everything that makes the simulated vehicle move: the
//! discrete-time physics step, the mutex-guarded simulator facade that
//! serializes every read and write, and the fixed-interval broadcast loop
//! that advances simulated time and fans telemetry out to subscribers.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `drivesim.yaml` into
//!   strongly-typed structs.
//! - [`rng`] -- [`DriveRng`] trait plus the system and fixed-sequence
//!   generators behind the autonomous driving behavior.
//! - [`runner`] -- The broadcast loop and the [`TelemetrySink`] seam to
//!   the transport layer.
//! - [`simulator`] -- The [`Simulator`] facade guarding the vehicle state.
//! - [`vehicle`] -- The raw [`VehicleState`] and its per-tick physics.
//!
//! [`DriveRng`]: rng::DriveRng
//! [`TelemetrySink`]: runner::TelemetrySink
//! [`Simulator`]: simulator::Simulator
//! [`VehicleState`]: vehicle::VehicleState

pub mod config;
pub mod rng;
pub mod runner;
pub mod simulator;
pub mod vehicle;
