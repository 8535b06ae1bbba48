//! Simulation time model.
//!
//! # Design
//!
//! The crowd model integrates with a floating-point step `dt` (seconds), but
//! scheduled continuations (spawn intervals, alighting bursts, boarding
//! delays) are keyed by `SimTime`, an integer count of **milliseconds** since
//! the start of the run.  Using an integer key means the timer queue orders
//! entries exactly and equal deadlines compare equal.
//!
//! `SimClock` tracks the step counter and the current `SimTime`.  Each call
//! to [`SimClock::advance`] adds the step's `dt`, rounded to whole
//! milliseconds, so fixed and variable time steps are both supported.

use std::fmt;

use crate::{PedError, PedResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Convert a non-negative duration in seconds to milliseconds.
    ///
    /// Negative and NaN inputs clamp to zero.
    #[inline]
    pub fn millis_from_secs(secs: f32) -> u64 {
        if secs.is_nan() || secs <= 0.0 {
            0
        } else {
            (secs as f64 * 1000.0).round() as u64
        }
    }

    /// The timestamp `secs` seconds after `self`.
    #[inline]
    pub fn after_secs(self, secs: f32) -> SimTime {
        SimTime(self.0 + Self::millis_from_secs(secs))
    }

    /// Elapsed seconds since the start of the run.
    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f32())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Step counter plus current timestamp.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    /// Number of completed steps.
    pub step: u64,
    /// Timestamp at the start of the current step.
    pub now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one step of `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.step += 1;
        self.now = self.now.after_secs(dt);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.step, self.now)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from the `[sim]` table of a scenario TOML file.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Integration step in seconds.
    pub time_step_secs: f32,

    /// Total steps to simulate.
    pub total_steps: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Width (x) and depth (z) of the simulated floor, in metres.
    pub plane_size: [f32; 2],

    /// Agents farther than `bounds_multiple × plane_size` from the origin on
    /// either axis are removed.
    pub bounds_multiple: f32,

    /// Continuous spawners pause while this many agents are active.
    pub max_agents: usize,

    /// Walking speeds are drawn uniformly from this range (m/s).
    pub min_speed: f32,
    pub max_speed: f32,

    /// Call `SimObserver::on_snapshot` every N steps.  `0` disables snapshots.
    pub output_interval_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step_secs:        0.05,
            total_steps:           2_400,
            seed:                  42,
            plane_size:            [30.0, 60.0],
            bounds_multiple:       5.0,
            max_agents:            1_000,
            min_speed:             1.0,
            max_speed:             1.5,
            output_interval_steps: 20,
        }
    }
}

impl SimConfig {
    /// Simulated duration of the whole run in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f32 {
        self.total_steps as f32 * self.time_step_secs
    }

    /// Reject configs the step loop cannot run with.
    pub fn validate(&self) -> PedResult<()> {
        if !(self.time_step_secs.is_finite() && self.time_step_secs > 0.0) {
            return Err(PedError::Config(format!(
                "time step must be positive, got {}",
                self.time_step_secs
            )));
        }
        if !(self.min_speed >= 0.0 && self.min_speed <= self.max_speed) {
            return Err(PedError::Config(format!(
                "invalid speed range [{}, {}]",
                self.min_speed, self.max_speed
            )));
        }
        if self.plane_size.iter().any(|&s| !(s.is_finite() && s > 0.0)) || !(self.bounds_multiple > 0.0) {
            return Err(PedError::Config(format!(
                "floor {:?} × {} encloses nothing",
                self.plane_size, self.bounds_multiple
            )));
        }
        Ok(())
    }

    /// `true` if `(x, z)` lies outside the removal bound.
    #[inline]
    pub fn out_of_bounds(&self, x: f32, z: f32) -> bool {
        x.abs() > self.plane_size[0] * self.bounds_multiple
            || z.abs() > self.plane_size[1] * self.bounds_multiple
    }
}
