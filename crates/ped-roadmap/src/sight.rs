//! Line-of-sight oracle.
//!
//! The simulation never raycasts itself; it asks a [`LineOfSight`] whether
//! one floor point is visible from another.  [`OpenFloor`] sees everything;
//! [`Walls`] blocks sight across a set of wall segments.

use ped_core::Vec2;

pub trait LineOfSight {
    /// `true` if nothing occludes the straight segment `from → to`.
    fn visible(&self, from: Vec2, to: Vec2) -> bool;
}

/// No obstacles at all.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenFloor;

impl LineOfSight for OpenFloor {
    #[inline]
    fn visible(&self, _from: Vec2, _to: Vec2) -> bool {
        true
    }
}

/// Occluding wall segments (platform edges, pillars, stairwell sides).
#[derive(Clone, Debug, Default)]
pub struct Walls {
    segments: Vec<(Vec2, Vec2)>,
}

impl Walls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, a: Vec2, b: Vec2) -> &mut Self {
        self.segments.push((a, b));
        self
    }

    /// Add the four sides of an axis-aligned box (a pillar or kiosk).
    pub fn add_box(&mut self, min: Vec2, max: Vec2) -> &mut Self {
        let (a, b) = (Vec2::new(max.x, min.y), Vec2::new(min.x, max.y));
        self.add(min, a).add(a, max).add(max, b).add(b, min)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl LineOfSight for Walls {
    fn visible(&self, from: Vec2, to: Vec2) -> bool {
        !self.segments.iter().any(|&(a, b)| segments_intersect(from, to, a, b))
    }
}

#[inline]
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Proper or touching intersection of segments `p1p2` and `q1q2`.
fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

#[inline]
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
