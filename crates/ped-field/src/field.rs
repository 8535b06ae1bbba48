//! The crowd field contract.
//!
//! The simulation drives any `CrowdField` through the same per-step
//! sequence:
//!
//! ```text
//!  update_density()          ─┐
//!  update_velocity_fields()   ├─ before agents move
//!  solve(dt)                 ─┘
//!  for each agent: sample density/face velocities, move,
//!                  add_density / add_velocity for next step
//! ```
//!
//! How the solve works (the LCP pressure projection of the continuum-crowd
//! model, a pass-through, or anything else) is the implementor's business.

use crate::{Cell, Face, GridLayout};

/// A discretized density and staggered velocity field shared by all agents.
pub trait CrowdField {
    fn layout(&self) -> &GridLayout;

    /// Density at which the continuum velocity fully overrides an agent's
    /// preferred velocity.
    fn max_density(&self) -> f32;

    /// Current density of `cell` (agents per square metre).
    fn density(&self, cell: Cell) -> f32;

    /// Current velocity component stored on `face` of `cell`.
    fn face_velocity(&self, cell: Cell, face: Face) -> f32;

    /// Fold the contributions written since the last step into the density
    /// field and clear the accumulators.
    fn update_density(&mut self);

    /// Same as [`update_density`](Self::update_density) for the velocity
    /// faces.
    fn update_velocity_fields(&mut self);

    /// Advance the field by `dt` seconds.
    fn solve(&mut self, dt: f32);

    /// Accumulate a density weight into `cell`.
    fn add_density(&mut self, cell: Cell, weight: f32);

    /// Accumulate `weight × velocity` into `face` of `cell`.
    fn add_velocity(&mut self, cell: Cell, face: Face, weight: f32, velocity: f32);
}
