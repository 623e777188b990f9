//! Pluggable random source for the autonomous driving behavior.
//!
//! The unattended vehicle drifts through driving phases by rolling dice
//! each tick. The rolls go through the [`DriveRng`] trait so the behavior
//! is reproducible in distribution in production (system entropy or a
//! configured seed) and exactly reproducible in tests, where a
//! [`SequenceRng`] replays a fixed series of draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random draws for the vehicle model.
///
/// Everything the physics step needs derives from a single uniform draw
/// in `[0, 1)`: probability gates, target ranges, and RPM jitter.
pub trait DriveRng: Send {
    /// Return the next uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Roll a probability gate: true with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Return a uniform draw in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

/// The production random source, backed by [`StdRng`].
///
/// Unseeded construction draws entropy from the operating system. A
/// seeded generator makes a whole run reproducible in distribution,
/// which is useful for demos and soak tests.
#[derive(Debug)]
pub struct SystemRng {
    inner: StdRng,
}

impl SystemRng {
    /// Create a generator seeded from operating system entropy.
    pub fn new() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Create a generator from an explicit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveRng for SystemRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.random()
    }
}

/// A test generator that replays a fixed sequence of draws, cycling
/// when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f64>,
    next: usize,
}

impl SequenceRng {
    /// Create a generator cycling through the given draws.
    ///
    /// An empty sequence behaves like [`SequenceRng::constant`] with 0.5.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// Create a generator that returns the same draw forever.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl DriveRng for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        let Some(&value) = self.values.get(self.next % self.values.len().max(1)) else {
            return 0.5;
        };
        self.next = self.next.wrapping_add(1);
        value
    }
}
