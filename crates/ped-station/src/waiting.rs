//! Waiting areas and their spot pools.
//!
//! A waiting area is a rectangle on the platform centred on one roadmap
//! node.  Its standing spots are generated once, either as a fixed
//! `rows × cols` grid or by packing square spots of a fixed size, and never
//! move afterwards.
//!
//! Occupancy is tracked twice: `occupied[i]` answers "is spot `i` taken" in
//! O(1), and `free` lists the untaken indices so a random free spot is an
//! O(1) `swap_remove`.  The two always agree:
//!
//! ```text
//! occupied_count + free.len() == spots.len()
//! i ∈ free  ⇔  !occupied[i]
//! ```

use ped_core::{AreaId, NodeId, Rect, SimRng, SpotReservation, Vec2};

use crate::{StationError, StationResult};

/// Default edge length of a square waiting spot, metres.
pub const DEFAULT_SPOT_SIZE: f32 = 0.5;

// ── Configuration ─────────────────────────────────────────────────────────────

/// How spots are laid out over the area's rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum SpotLayout {
    /// Exactly `rows × cols` spots, stretched to fill the rectangle.
    Grid { rows: usize, cols: usize },
    /// As many `spot_size` squares as fit along each axis.
    Packed { spot_size: f32 },
}

impl Default for SpotLayout {
    fn default() -> Self {
        SpotLayout::Packed { spot_size: DEFAULT_SPOT_SIZE }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaitingAreaConfig {
    /// Roadmap node at the centre of the area.  Agents path here first.
    pub node: NodeId,
    /// Width (x) and depth (z) of the area, metres.
    pub size: [f32; 2],
    /// Larger values make the area less attractive.
    #[cfg_attr(feature = "serde", serde(default = "default_priority"))]
    pub priority: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layout: SpotLayout,
}

#[cfg(feature = "serde")]
fn default_priority() -> f32 {
    1.0
}

impl WaitingAreaConfig {
    pub fn new(node: NodeId, size: [f32; 2]) -> Self {
        Self { node, size, priority: 1.0, layout: SpotLayout::default() }
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_layout(mut self, layout: SpotLayout) -> Self {
        self.layout = layout;
        self
    }
}

// ── WaitingArea ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct WaitingArea {
    pub id: AreaId,
    pub node: NodeId,
    pub position: Vec2,
    pub priority: f32,

    spots: Vec<Vec2>,
    occupied: Vec<bool>,
    free: Vec<usize>,
}

impl WaitingArea {
    /// Generate the spots of an area centred on `position`.
    ///
    /// Fails if the layout yields no spots.
    pub fn new(id: AreaId, position: Vec2, config: &WaitingAreaConfig) -> StationResult<Self> {
        let rect = Rect::centered(position, Vec2::new(config.size[0], config.size[1]));
        let spots = generate_spots(rect, config.layout);
        if spots.is_empty() {
            return Err(StationError::InvalidArea {
                area: id,
                reason: format!("{:?} fits no spot into {:?}", config.layout, config.size),
            });
        }
        let n = spots.len();
        Ok(Self {
            id,
            node: config.node,
            position,
            priority: config.priority,
            spots,
            occupied: vec![false; n],
            free: (0..n).collect(),
        })
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.spots.len()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.spots.len() - self.free.len()
    }

    #[inline]
    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    /// Occupied share of the spots, in [0, 1].
    pub fn occupancy(&self) -> f32 {
        self.occupied_count() as f32 / self.spots.len() as f32
    }

    pub fn spot(&self, index: usize) -> Option<Vec2> {
        self.spots.get(index).copied()
    }

    pub fn spots(&self) -> &[Vec2] {
        &self.spots
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.occupied.get(index).copied().unwrap_or(false)
    }

    /// Take a uniformly random free spot.
    pub fn reserve(&mut self, rng: &mut SimRng) -> Option<SpotReservation> {
        if self.free.is_empty() {
            return None;
        }
        let k = rng.gen_range(0..self.free.len());
        let spot = self.free.swap_remove(k);
        self.occupied[spot] = true;
        Some(SpotReservation::issue(self.id, spot))
    }

    /// Hand a spot back.  The token is consumed either way; on error it is
    /// returned inside the error.
    pub fn release(&mut self, reservation: SpotReservation) -> StationResult<()> {
        if reservation.area() != self.id {
            return Err(StationError::UnknownArea(reservation));
        }
        let spot = reservation.spot();
        if !self.is_occupied(spot) {
            return Err(StationError::SpotNotOccupied(reservation));
        }
        self.occupied[spot] = false;
        self.free.push(spot);
        Ok(())
    }

    /// `true` if the occupancy flags and the free list agree.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.spots.len()];
        for &i in &self.free {
            if i >= seen.len() || seen[i] || self.occupied[i] {
                return false;
            }
            seen[i] = true;
        }
        let occupied = self.occupied.iter().filter(|&&o| o).count();
        occupied + self.free.len() == self.spots.len()
    }
}

fn generate_spots(rect: Rect, layout: SpotLayout) -> Vec<Vec2> {
    let size = rect.size();
    let (rows, cols, cell_x, cell_z) = match layout {
        SpotLayout::Grid { rows, cols } => {
            if rows == 0 || cols == 0 {
                return Vec::new();
            }
            (rows, cols, size.x / cols as f32, size.y / rows as f32)
        }
        SpotLayout::Packed { spot_size } => {
            if spot_size.is_nan() || spot_size <= 0.0 {
                return Vec::new();
            }
            let cols = (size.x / spot_size).floor().max(0.0) as usize;
            let rows = (size.y / spot_size).floor().max(0.0) as usize;
            (rows, cols, spot_size, spot_size)
        }
    };

    let mut spots = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            spots.push(Vec2::new(
                rect.min.x + cell_x * (col as f32 + 0.5),
                rect.min.y + cell_z * (row as f32 + 0.5),
            ));
        }
    }
    spots
}
