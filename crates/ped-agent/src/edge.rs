//! Platform-edge ("yellow line") repulsion.
//!
//! Tracks run parallel to the floor's `z` axis, so a platform edge is a line
//! of constant `|x|`.  Between the yellow line and the edge an agent is
//! pushed back toward the safe side with a strength that grows linearly from
//! zero at the yellow line to full walking speed at the edge.

use ped_core::{LineId, Vec2};

/// Platform layout of the station.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlatformType {
    /// One island platform between the two tracks.
    Central,
    /// Two platforms outside the tracks.
    Side,
    /// Island platform and side platforms.
    #[default]
    Mixed,
}

/// One mirrored pair of edges at `x = ±edge_x` with the yellow line at
/// `x = ±buffer_x`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeZone {
    pub edge_x: f32,
    pub buffer_x: f32,
}

const CENTRAL: EdgeZone = EdgeZone { edge_x: 3.0, buffer_x: 1.76 };
const SIDE: EdgeZone = EdgeZone { edge_x: 6.0, buffer_x: 7.24 };

impl PlatformType {
    pub fn zones(self) -> &'static [EdgeZone] {
        match self {
            PlatformType::Central => &[CENTRAL],
            PlatformType::Side => &[SIDE],
            PlatformType::Mixed => &[CENTRAL, SIDE],
        }
    }
}

impl EdgeZone {
    /// Normalized depth of `|x|` into the buffer: 0 at the yellow line, 1 at
    /// the edge, `None` outside the buffer.
    pub fn depth(&self, abs_x: f32) -> Option<f32> {
        let (lo, hi) = if self.buffer_x < self.edge_x {
            (self.buffer_x, self.edge_x)
        } else {
            (self.edge_x, self.buffer_x)
        };
        if abs_x > lo && abs_x < hi {
            Some(((self.buffer_x - abs_x) / (self.buffer_x - self.edge_x)).clamp(0.0, 1.0))
        } else {
            None
        }
    }

    /// Sign of the push along `+x` for an agent on the `+x` side.
    #[inline]
    fn outward(&self) -> f32 {
        (self.buffer_x - self.edge_x).signum()
    }
}

/// Repulsion for an agent at `x` walking at `walking_speed`.
pub fn yellow_line_force(platform: PlatformType, x: f32, walking_speed: f32) -> Vec2 {
    let side = if x >= 0.0 { 1.0 } else { -1.0 };
    let abs_x = x.abs();
    let fx: f32 = platform
        .zones()
        .iter()
        .filter_map(|z| z.depth(abs_x).map(|d| z.outward() * side * d * walking_speed))
        .sum();
    Vec2::new(fx, 0.0)
}

/// Platform geometry plus which lines currently have a train standing at
/// their edge.
#[derive(Clone, Debug, Default)]
pub struct EdgeGuard {
    pub platform: PlatformType,
    pub dwelling: Vec<LineId>,
}

impl EdgeGuard {
    pub fn new(platform: PlatformType) -> Self {
        Self { platform, dwelling: Vec::new() }
    }

    /// `true` if the edge on the side of `x` is currently guarded (no train
    /// standing there).  Alighting agents are always guarded.
    pub fn guards(&self, x: f32, alighting: bool) -> bool {
        alighting || !self.dwelling.contains(&LineId::for_side(x))
    }

    /// Edge repulsion for an agent, or zero if the edge is not guarded.
    pub fn force(&self, position: Vec2, walking_speed: f32, alighting: bool) -> Vec2 {
        if self.guards(position.x, alighting) {
            yellow_line_force(self.platform, position.x, walking_speed)
        } else {
            Vec2::new(0.0, 0.0)
        }
    }
}
