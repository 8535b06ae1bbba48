//! Capture shapes of roadmap nodes.
//!
//! A node is "reached" once an agent stands inside its shape, and agents aim
//! at the shape's target point rather than at the node centre.  Wide doors
//! and platform-long corridors use ellipses so that a crowd spreads along
//! the major axis instead of funnelling to one point.

use ped_core::Vec2;

/// Capture zone around a node's position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeShape {
    /// Reached within `radius` of the centre; the target is the centre.
    Circle { radius: f32 },
    /// Reached inside the rotated ellipse; the target is the point of the
    /// major axis segment closest to the agent.
    Ellipse {
        /// Semi-axis along the node's local `x`.
        semi_x: f32,
        /// Semi-axis along the node's local `z`.
        semi_z: f32,
        /// Counter-clockwise rotation of the local axes, radians.
        rotation: f32,
    },
}

impl Default for NodeShape {
    /// A 1 m wide circular node.
    fn default() -> Self {
        NodeShape::Circle { radius: 0.5 }
    }
}

impl NodeShape {
    /// `None` if the shape is usable, otherwise why not.
    pub fn degeneracy(&self) -> Option<&'static str> {
        match *self {
            NodeShape::Circle { radius } if !(radius > 0.0 && radius.is_finite()) => {
                Some("circle radius must be positive")
            }
            NodeShape::Ellipse { semi_x, semi_z, .. }
                if !(semi_x > 0.0 && semi_z > 0.0 && semi_x.is_finite() && semi_z.is_finite()) =>
            {
                Some("ellipse semi-axes must be positive")
            }
            _ => None,
        }
    }
}

/// Rotate `v` by `-angle` (world → local).
#[inline]
fn to_local(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos)
}

/// Rotate `v` by `angle` (local → world).
#[inline]
fn to_world(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// `true` if `point` lies in the capture zone of a node at `center`.
pub fn contains_point(shape: &NodeShape, center: Vec2, point: Vec2) -> bool {
    match *shape {
        NodeShape::Circle { radius } => {
            let d = point - center;
            d.x * d.x + d.y * d.y < radius * radius
        }
        NodeShape::Ellipse { semi_x, semi_z, rotation } => {
            let local = to_local(point - center, rotation);
            (local.x * local.x) / (semi_x * semi_x) + (local.y * local.y) / (semi_z * semi_z) <= 1.0
        }
    }
}

/// The point an agent at `origin` should walk toward to reach the node.
pub fn target_point(shape: &NodeShape, center: Vec2, origin: Vec2) -> Vec2 {
    match *shape {
        NodeShape::Circle { .. } => center,
        NodeShape::Ellipse { semi_x, semi_z, rotation } => {
            let local = to_local(origin - center, rotation);
            let on_axis = if semi_x >= semi_z {
                Vec2::new(local.x.clamp(-semi_x, semi_x), 0.0)
            } else {
                Vec2::new(0.0, local.y.clamp(-semi_z, semi_z))
            };
            center + to_world(on_axis, rotation)
        }
    }
}
