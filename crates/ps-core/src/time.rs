//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Step` counter.  The
//! mapping to simulated seconds is held in `SimClock`:
//!
//!   elapsed_secs = step * dt
//!
//! Using an integer step as the canonical time unit keeps comparisons exact;
//! the floating-point product is only formed when a caller asks for seconds.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Fixed-timestep clock.  `dt` is validated once at construction and never
/// changes for the lifetime of a simulation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    dt: f64,
    /// The current step, advanced by `SimClock::advance()` each iteration.
    pub current_step: Step,
}

impl SimClock {
    /// Create a clock at step 0 with timestep `dt` seconds.
    ///
    /// Fails if `dt` is not finite or not strictly positive.
    pub fn new(dt: f64) -> CoreResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CoreError::InvalidTimeStep(dt));
        }
        Ok(Self { dt, current_step: Step::ZERO })
    }

    /// Seconds per step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }

    /// Elapsed simulated seconds since step 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_step.0 as f64 * self.dt
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.2} s)", self.current_step, self.elapsed_secs())
    }
}
