//! Plane geometry.
//!
//! The simulation lives on the station floor.  A `Vec2` stores the floor's
//! `(x, z)` coordinates in its `x` and `y` components; there is no vertical
//! component, so agents cannot drift off the floor plane.

use cgmath::{InnerSpace, Zero};

/// A point or vector on the floor plane, in metres.
pub type Vec2 = cgmath::Vector2<f32>;

/// Unit vector in the direction of `v`, or zero if `v` has no length.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let mag2 = v.magnitude2();
    if mag2 > f32::EPSILON * f32::EPSILON {
        v / mag2.sqrt()
    } else {
        Vec2::zero()
    }
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
///
/// Returns `0.0` when either vector is zero.
pub fn angle_between_deg(a: Vec2, b: Vec2) -> f32 {
    let a = normalize_or_zero(a);
    let b = normalize_or_zero(b);
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Rotate direction `current` toward direction `target` by at most
/// `max_radians`, returning a unit vector.
///
/// If `current` is zero the target direction is returned unchanged.
pub fn rotate_towards(current: Vec2, target: Vec2, max_radians: f32) -> Vec2 {
    let from = normalize_or_zero(current);
    let to = normalize_or_zero(target);
    if from.is_zero() {
        return to;
    }
    if to.is_zero() {
        return from;
    }
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    if angle <= max_radians {
        return to;
    }
    // Sign of the 2-D cross product picks the shorter rotation direction.
    let cross = from.x * to.y - from.y * to.x;
    let step = if cross >= 0.0 { max_radians } else { -max_radians };
    let (sin, cos) = step.sin_cos();
    Vec2::new(from.x * cos - from.y * sin, from.x * sin + from.y * cos)
}

/// Axis-aligned rectangle on the floor plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self { min: center - half, max: center + half }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
