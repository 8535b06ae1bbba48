//! `StaggeredGrid`: a dense, solver-free `CrowdField`.
//!
//! Each step the accumulated agent contributions become the new fields:
//!
//! - density of a cell = accumulated weight / cell area, so one agent at a
//!   cell centre produces exactly `1 / L²`;
//! - velocity of a face = weighted mean of the velocities written to it
//!   (zero when nothing was written).
//!
//! `solve` only clamps densities to `max_density`.  Plug a real pressure
//! solver in by implementing [`CrowdField`] on another type.

use crate::{Cell, CrowdField, Face, FieldError, FieldResult, GridLayout};

pub struct StaggeredGrid {
    layout: GridLayout,
    max_density: f32,

    density: Vec<f32>,
    /// `[left, right, upper, lower]` per cell.
    velocity: Vec<[f32; 4]>,

    density_acc: Vec<f32>,
    momentum_acc: Vec<[f32; 4]>,
    weight_acc: Vec<[f32; 4]>,
}

impl StaggeredGrid {
    pub fn new(layout: GridLayout, max_density: f32) -> FieldResult<Self> {
        if !(max_density.is_finite() && max_density > 0.0) {
            return Err(FieldError::InvalidMaxDensity(max_density));
        }
        let n = layout.cell_count();
        Ok(Self {
            layout,
            max_density,
            density: vec![0.0; n],
            velocity: vec![[0.0; 4]; n],
            density_acc: vec![0.0; n],
            momentum_acc: vec![[0.0; 4]; n],
            weight_acc: vec![[0.0; 4]; n],
        })
    }

    /// Sum of all cell densities times the cell area: the number of agents
    /// the field currently "sees".
    pub fn total_mass(&self) -> f32 {
        self.density.iter().sum::<f32>() * self.layout.cell_area()
    }

    /// Overwrite the density of one cell, bypassing accumulation.
    pub fn set_density(&mut self, cell: Cell, value: f32) {
        let i = self.layout.flat(cell);
        self.density[i] = value;
    }

    /// Overwrite one face velocity, bypassing accumulation.
    pub fn set_face_velocity(&mut self, cell: Cell, face: Face, value: f32) {
        let i = self.layout.flat(cell);
        self.velocity[i][face.slot()] = value;
    }
}

impl CrowdField for StaggeredGrid {
    fn layout(&self) -> &GridLayout {
        &self.layout
    }

    fn max_density(&self) -> f32 {
        self.max_density
    }

    fn density(&self, cell: Cell) -> f32 {
        self.density[self.layout.flat(cell)]
    }

    fn face_velocity(&self, cell: Cell, face: Face) -> f32 {
        self.velocity[self.layout.flat(cell)][face.slot()]
    }

    fn update_density(&mut self) {
        let area = self.layout.cell_area();
        for (d, acc) in self.density.iter_mut().zip(self.density_acc.iter_mut()) {
            *d = *acc / area;
            *acc = 0.0;
        }
    }

    fn update_velocity_fields(&mut self) {
        let cells = self
            .velocity
            .iter_mut()
            .zip(self.momentum_acc.iter_mut())
            .zip(self.weight_acc.iter_mut());
        for ((faces, momentum), weight) in cells {
            for slot in 0..4 {
                faces[slot] = if weight[slot] > 0.0 { momentum[slot] / weight[slot] } else { 0.0 };
                momentum[slot] = 0.0;
                weight[slot] = 0.0;
            }
        }
    }

    fn solve(&mut self, _dt: f32) {
        let max = self.max_density;
        for d in &mut self.density {
            *d = d.min(max);
        }
    }

    fn add_density(&mut self, cell: Cell, weight: f32) {
        let i = self.layout.flat(cell);
        self.density_acc[i] += weight;
    }

    fn add_velocity(&mut self, cell: Cell, face: Face, weight: f32, velocity: f32) {
        let i = self.layout.flat(cell);
        let slot = face.slot();
        self.momentum_acc[i][slot] += weight * velocity;
        self.weight_acc[i][slot] += weight;
    }
}
