//! Inverse-bilinear coupling between one agent and the field.
//!
//! An agent at offset `(rx, rz)` from its cell centre is treated as a
//! cell-sized square centred on itself.  That square overlaps its own cell
//! and, in the direction of each offset's sign, one `x` neighbour, one `z`
//! neighbour and the diagonal between them.  With `L` the cell length,
//! `sx = L - |rx|` and `sz = L - |rz|`, the overlap areas divided by `L²`
//! are:
//!
//! ```text
//!  self      sx·sz       x-neighbour  sz·|rx|
//!  diagonal  |rx·rz|     z-neighbour  sx·|rz|
//! ```
//!
//! The velocity faces sit half a cell off the centre, so the `x`-component
//! weights use the shifted offsets `L/2 ± rx` on the agent's own row and on
//! the `z`-neighbour row; the `z` component uses `L/2 ± rz` on the own
//! column and the `x`-neighbour column.
//!
//! [`Coupling::sample_density`], [`Coupling::sample_velocity`] and
//! [`Coupling::splat`] all use the same weight set, which keeps the
//! agent → field → agent loop symmetric.
//!
//! Neighbours outside the grid are skipped and the remaining weights are not
//! renormalized, so agents on the border see slightly less of the field.

use ped_core::Vec2;

use crate::{Cell, CrowdField, Face, GridLayout};

/// The eight-plus-eight weight set of one agent for one step.
#[derive(Clone, Debug, PartialEq)]
pub struct Coupling {
    pub cell: Cell,
    /// Offset from the cell centre, each axis in `[-L/2, L/2]`.
    pub rel: Vec2,
    /// Column step toward the `x` neighbour (`+1` or `-1`).
    pub x_dir: isize,
    /// Row step toward the `z` neighbour (`+1` or `-1`).
    pub z_dir: isize,

    pub self_weight: f32,
    pub x_weight: f32,
    pub z_weight: f32,
    pub xz_weight: f32,

    pub self_right: f32,
    pub self_left: f32,
    pub self_upper: f32,
    pub self_lower: f32,
    pub neighbour_right: f32,
    pub neighbour_left: f32,
    pub neighbour_upper: f32,
    pub neighbour_lower: f32,
}

impl Coupling {
    /// Compute the weight set of an agent standing at `position`.
    pub fn at(layout: &GridLayout, position: Vec2) -> Self {
        let (cell, rel) = layout.locate(position);
        Self::from_offset(layout.cell_length, cell, rel)
    }

    /// Compute the weight set from an already resolved cell and offset.
    pub fn from_offset(cell_length: f32, cell: Cell, rel: Vec2) -> Self {
        let l2 = cell_length * cell_length;
        let half = cell_length * 0.5;
        let (ax, az) = (rel.x.abs(), rel.y.abs());
        let side_x = cell_length - ax;
        let side_z = cell_length - az;

        let right = half + rel.x;
        let left = half - rel.x;
        let upper = half + rel.y;
        let lower = half - rel.y;

        Self {
            cell,
            rel,
            x_dir: if rel.x >= 0.0 { 1 } else { -1 },
            z_dir: if rel.y >= 0.0 { 1 } else { -1 },

            self_weight: side_x * side_z / l2,
            x_weight:    side_z * ax / l2,
            z_weight:    side_x * az / l2,
            xz_weight:   ax * az / l2,

            self_right:      right * side_z / l2,
            self_left:       left * side_z / l2,
            self_upper:      upper * side_x / l2,
            self_lower:      lower * side_x / l2,
            neighbour_right: right * az / l2,
            neighbour_left:  left * az / l2,
            neighbour_upper: upper * ax / l2,
            neighbour_lower: lower * ax / l2,
        }
    }

    /// Cells and weights touched by the density coupling, own cell first.
    pub fn density_cells(&self, layout: &GridLayout) -> [Option<(Cell, f32)>; 4] {
        [
            Some((self.cell, self.self_weight)),
            layout.offset(self.cell, 0, self.x_dir).map(|c| (c, self.x_weight)),
            layout.offset(self.cell, self.z_dir, 0).map(|c| (c, self.z_weight)),
            layout
                .offset(self.cell, self.z_dir, self.x_dir)
                .map(|c| (c, self.xz_weight)),
        ]
    }

    /// Faces and weights touched by the `x` and `z` velocity couplings.
    fn velocity_faces(&self, layout: &GridLayout) -> [Option<(Cell, Face, f32)>; 8] {
        let z_row = layout.offset(self.cell, self.z_dir, 0);
        let x_col = layout.offset(self.cell, 0, self.x_dir);
        [
            Some((self.cell, Face::Left, self.self_left)),
            Some((self.cell, Face::Right, self.self_right)),
            Some((self.cell, Face::Upper, self.self_upper)),
            Some((self.cell, Face::Lower, self.self_lower)),
            z_row.map(|c| (c, Face::Left, self.neighbour_left)),
            z_row.map(|c| (c, Face::Right, self.neighbour_right)),
            x_col.map(|c| (c, Face::Upper, self.neighbour_upper)),
            x_col.map(|c| (c, Face::Lower, self.neighbour_lower)),
        ]
    }

    /// Bilinear density at the agent's position.
    pub fn sample_density<F: CrowdField + ?Sized>(&self, field: &F) -> f32 {
        self.density_cells(field.layout())
            .into_iter()
            .flatten()
            .map(|(cell, w)| w * field.density(cell))
            .sum()
    }

    /// Continuum velocity at the agent's position.
    ///
    /// A NaN on either axis (a corrupt face upstream) is replaced by zero on
    /// that axis only.
    pub fn sample_velocity<F: CrowdField + ?Sized>(&self, field: &F) -> Vec2 {
        let mut v = Vec2::new(0.0, 0.0);
        for (cell, face, w) in self.velocity_faces(field.layout()).into_iter().flatten() {
            let sample = w * field.face_velocity(cell, face);
            match face {
                Face::Left | Face::Right => v.x += sample,
                Face::Upper | Face::Lower => v.y += sample,
            }
        }
        if v.x.is_nan() {
            v.x = 0.0;
        }
        if v.y.is_nan() {
            v.y = 0.0;
        }
        v
    }

    /// Write this agent's density and `velocity` into the field.
    ///
    /// `velocity` is `None` for agents that only occupy space (standing in a
    /// waiting spot, holding still before boarding).
    pub fn splat<F: CrowdField + ?Sized>(&self, field: &mut F, velocity: Option<Vec2>) {
        let density = self.density_cells(field.layout());
        for (cell, w) in density.into_iter().flatten() {
            field.add_density(cell, w);
        }
        let Some(velocity) = velocity else { return };
        let faces = self.velocity_faces(field.layout());
        for (cell, face, w) in faces.into_iter().flatten() {
            let component = match face {
                Face::Left | Face::Right => velocity.x,
                Face::Upper | Face::Lower => velocity.y,
            };
            field.add_velocity(cell, face, w, component);
        }
    }

    /// Sum of the four density weights (1 away from the grid border).
    pub fn density_weight_sum(&self) -> f32 {
        self.self_weight + self.x_weight + self.z_weight + self.xz_weight
    }
}
