//! Per-step agent motion.
//!
//! # One step of a moving agent
//!
//! ```text
//!  preferred velocity   path following / point goal, turn smoothing
//!        │
//!  edge repulsion       added to the avoidance term when guarded
//!        │
//!  density blend        pref + clamp01((ρ - 1/L²) / ρmax) · (cont - pref)
//!        │              then + avoidance
//!  integrate            position += velocity · dt
//!        │
//!  couple               new weights, splat density + velocity
//! ```
//!
//! Standing agents (waiting, or selected for boarding but not yet released)
//! take the passive branch instead: only the avoidance and edge terms move
//! them, and they write density but no velocity into the field.

use ped_core::Vec2;
use ped_core::cgmath::{InnerSpace, Zero};
use ped_core::geo::{angle_between_deg, normalize_or_zero, rotate_towards};
use ped_field::{Coupling, CrowdField};
use ped_roadmap::{LineOfSight, Roadmap};

use crate::{Agent, EdgeGuard, Navigation};

/// Bearing change above which a new path leg is turned into gradually.
pub const TURN_THRESHOLD_DEG: f32 = 20.0;

/// Passive displacements smaller than this are ignored.
const PASSIVE_EPSILON: f32 = 0.01;

// ── MotionConfig ──────────────────────────────────────────────────────────────

/// Path-following switches.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Advance to the next path node as soon as it is visible.
    pub skip_node_if_visible: bool,
    /// Aim back at the previous node when the current one is occluded.
    pub walk_back: bool,
    /// Rotate into sharp turns instead of snapping.
    pub smooth_turns: bool,
    /// Point-mode arrival distance, metres.
    pub point_threshold: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            skip_node_if_visible: false,
            walk_back:            false,
            smooth_turns:         true,
            point_threshold:      0.5,
        }
    }
}

/// Maximum turn per step in radians: `dt · (35 - 400·dt)` degrees.
#[inline]
pub fn max_turn_radians(dt: f32) -> f32 {
    (dt * (35.0 - 400.0 * dt)).to_radians()
}

// ── MotionContext ─────────────────────────────────────────────────────────────

/// Read-only world state the motion model needs for one step.
pub struct MotionContext<'a, S: LineOfSight + ?Sized> {
    pub roadmap: &'a Roadmap,
    pub sight: &'a S,
    pub config: &'a MotionConfig,
    pub edges: &'a EdgeGuard,
    pub dt: f32,
}

// ── Preferred velocity ────────────────────────────────────────────────────────

/// Update `agent.preferred_velocity` (and `done`) from its navigation.
pub fn update_preferred_velocity<S: LineOfSight + ?Sized>(agent: &mut Agent, ctx: &MotionContext<'_, S>) {
    let dir = if let Navigation::Point(goal) = agent.nav {
        let to_goal = goal - agent.position;
        if to_goal.magnitude() < ctx.config.point_threshold {
            agent.done = true;
            Vec2::zero()
        } else {
            normalize_or_zero(to_goal)
        }
    } else {
        path_direction(agent, ctx)
    };
    agent.preferred_velocity = dir * agent.walking_speed;
}

/// Can the agent see the aim point of path node `index`?
fn can_see<S: LineOfSight + ?Sized>(agent: &Agent, ctx: &MotionContext<'_, S>, index: usize) -> bool {
    let Navigation::Path { nodes, .. } = &agent.nav else { return false };
    let Some(&node) = nodes.get(index) else { return false };
    let Ok(point) = ctx.roadmap.target_point(node, agent.position) else { return false };
    // Look from one step behind so an agent pressed against a corner does
    // not see through it.
    ctx.sight.visible(agent.position - agent.heading, point)
}

fn path_direction<S: LineOfSight + ?Sized>(agent: &mut Agent, ctx: &MotionContext<'_, S>) -> Vec2 {
    let Navigation::Path { nodes, index } = &agent.nav else { return Vec2::zero() };
    let (len, idx) = (nodes.len(), *index);
    let Some(current) = nodes.get(idx).copied() else {
        agent.done = true;
        return Vec2::zero();
    };

    let previous_dir = normalize_or_zero(agent.preferred_velocity);
    let max_turn = max_turn_radians(ctx.dt);
    let smooth = ctx.config.smooth_turns && max_turn > 0.0;

    let reached = ctx.roadmap.contains_point(current, agent.position)
        || (ctx.config.skip_node_if_visible && can_see(agent, ctx, idx + 1));

    if reached {
        let next = (idx + 1).min(len);
        if let Navigation::Path { index, .. } = &mut agent.nav {
            *index = next;
        }
        if next >= len {
            agent.done = true;
            return previous_dir;
        }
        let next_node = agent.nav.current_node().unwrap_or(current);
        if let Ok(p) = ctx.roadmap.target_point(next_node, agent.position) {
            agent.target = p;
        }
        let next_dir = normalize_or_zero(agent.target - agent.position);
        if smooth && angle_between_deg(previous_dir, next_dir) > TURN_THRESHOLD_DEG {
            agent.turning = true;
            return normalize_or_zero(rotate_towards(agent.velocity, next_dir, max_turn));
        }
        return next_dir;
    }

    if idx > 0 && ctx.config.walk_back && !can_see(agent, ctx, idx) {
        agent.turning = false;
        let back = match &agent.nav {
            Navigation::Path { nodes, .. } => nodes[idx - 1],
            Navigation::Point(_) => current,
        };
        return match ctx.roadmap.target_point(back, agent.position) {
            Ok(p) => normalize_or_zero(p - agent.position),
            Err(_) => previous_dir,
        };
    }

    let next_dir = normalize_or_zero(agent.target - agent.position);
    if agent.turning && smooth && angle_between_deg(previous_dir, next_dir) > TURN_THRESHOLD_DEG {
        normalize_or_zero(rotate_towards(agent.velocity, next_dir, max_turn))
    } else {
        agent.turning = false;
        next_dir
    }
}

// ── Field blend ───────────────────────────────────────────────────────────────

/// Blend factor between preferred and continuum velocity for a sampled
/// density: 0 when the agent is alone in its cell, 1 at `max_density` above
/// that.
#[inline]
pub fn crowd_blend(density: f32, cell_length: f32, max_density: f32) -> f32 {
    let own = 1.0 / (cell_length * cell_length);
    ((density - own) / max_density).clamp(0.0, 1.0)
}

/// Set `agent.velocity` from its preferred velocity and the field, then add
/// the avoidance term.
pub fn apply_field<F: CrowdField + ?Sized>(agent: &mut Agent, field: &F) {
    let layout = field.layout();
    let position = agent.position;
    let coupling = agent
        .coupling
        .get_or_insert_with(|| Coupling::at(layout, position));
    let density = coupling.sample_density(field);
    agent.continuum_velocity = coupling.sample_velocity(field);

    let t = crowd_blend(density, layout.cell_length, field.max_density());
    let v = agent.preferred_velocity + (agent.continuum_velocity - agent.preferred_velocity) * t;
    if !v.is_zero() {
        agent.heading = normalize_or_zero(v);
    }
    agent.velocity = v + agent.avoidance_velocity;
}

// ── Step ──────────────────────────────────────────────────────────────────────

/// Advance a moving agent by one step and write it into `field`.
///
/// Agents already `done` are left untouched.
pub fn step<F, S>(agent: &mut Agent, ctx: &MotionContext<'_, S>, field: &mut F)
where
    F: CrowdField + ?Sized,
    S: LineOfSight + ?Sized,
{
    if agent.done {
        return;
    }
    update_preferred_velocity(agent, ctx);
    let edge = ctx.edges.force(agent.position, agent.walking_speed, agent.state.is_alighting());
    agent.push(edge);
    apply_field(agent, field);

    agent.position += agent.velocity * ctx.dt;
    agent.avoidance_velocity = Vec2::zero();

    let coupling = Coupling::at(field.layout(), agent.position);
    coupling.splat(field, Some(agent.velocity));
    agent.coupling = Some(coupling);
}

/// Move a standing agent only by what pushes it, and register it as an
/// obstacle in `field`.
pub fn passive_step<F, S>(agent: &mut Agent, ctx: &MotionContext<'_, S>, field: &mut F)
where
    F: CrowdField + ?Sized,
    S: LineOfSight + ?Sized,
{
    let edge = ctx.edges.force(agent.position, agent.walking_speed, false);
    let force = agent.avoidance_velocity + edge;
    if force.magnitude() > PASSIVE_EPSILON {
        agent.position += force * ctx.dt;
        agent.heading = normalize_or_zero(force);
    }
    agent.avoidance_velocity = Vec2::zero();
    agent.velocity = Vec2::zero();

    let coupling = Coupling::at(field.layout(), agent.position);
    coupling.splat(field, None);
    agent.coupling = Some(coupling);
}
