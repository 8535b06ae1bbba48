//! Weighted waiting-area selection.
//!
//! # Score
//!
//! For an agent coming from node `o` and heading for line `l`, every area
//! `a` with a free spot is scored
//!
//! ```text
//! w_distance · |o - a| / 150
//!   + w_density  · occupancy(a)
//!   + w_line     · (0 if side(a) serves l else 1)
//!   + w_priority · priority(a) · 0.1
//! ```
//!
//! and the lowest score wins; on a tie the first area in registration order
//! is kept.  With `force_line` set, areas on the other side are skipped
//! outright.  Distances from the roadmap's spawn nodes are computed once at
//! construction; any other origin falls back to a straight-line distance.

use rustc_hash::FxHashMap;

use ped_core::cgmath::MetricSpace;
use ped_core::{AreaId, LineId, NodeId, SimRng, SpotReservation, Vec2};

use crate::{StationError, StationResult, WaitingArea};

/// Distances are divided by this to bring them to roughly [0, 1].
pub const DISTANCE_SCALE: f32 = 150.0;

/// Factor applied to an area's priority in the score.
pub const PRIORITY_SCALE: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocatorWeights {
    pub distance: f32,
    pub density: f32,
    pub line: f32,
    pub priority: f32,
}

impl Default for AllocatorWeights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            density:  1.0,
            line:     1.0,
            priority: 1.0,
        }
    }
}

/// Registry of all waiting areas plus the scoring rule.
#[derive(Debug)]
pub struct WaitingAreaAllocator {
    areas: Vec<WaitingArea>,
    weights: AllocatorWeights,
    distances: FxHashMap<(NodeId, AreaId), f32>,
}

impl WaitingAreaAllocator {
    /// Register `areas` (their ids must equal their index) and precompute
    /// distances from every `(node, position)` origin.
    pub fn new(
        areas: Vec<WaitingArea>,
        weights: AllocatorWeights,
        origins: impl IntoIterator<Item = (NodeId, Vec2)>,
    ) -> Self {
        let mut distances = FxHashMap::default();
        for (node, pos) in origins {
            for area in &areas {
                distances.insert((node, area.id), pos.distance(area.position));
            }
        }
        log::debug!("allocator: {} areas, {} precomputed distances", areas.len(), distances.len());
        Self { areas, weights, distances }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn area(&self, id: AreaId) -> Option<&WaitingArea> {
        self.areas.get(id.index())
    }

    pub fn areas(&self) -> &[WaitingArea] {
        &self.areas
    }

    /// Distance from `origin` to `area`, precomputed when available.
    pub fn distance(&self, origin: NodeId, origin_pos: Vec2, area: &WaitingArea) -> f32 {
        self.distances
            .get(&(origin, area.id))
            .copied()
            .unwrap_or_else(|| origin_pos.distance(area.position))
    }

    /// Score of `area` for an agent from `origin` bound for `line`, or
    /// `None` if the area cannot be offered (full, or wrong side under
    /// `force_line`).
    pub fn score(
        &self,
        area: &WaitingArea,
        origin: NodeId,
        origin_pos: Vec2,
        line: LineId,
        force_line: bool,
    ) -> Option<f32> {
        if !area.has_free() {
            return None;
        }
        let matches = LineId::for_side(area.position.x) == line;
        if force_line && !matches {
            return None;
        }
        let w = &self.weights;
        let mismatch = if matches { 0.0 } else { 1.0 };
        Some(
            w.distance * self.distance(origin, origin_pos, area) / DISTANCE_SCALE
                + w.density * area.occupancy()
                + w.line * mismatch
                + w.priority * area.priority * PRIORITY_SCALE,
        )
    }

    /// Best-scoring area for the request, without reserving anything.
    pub fn best_area(
        &self,
        origin: NodeId,
        origin_pos: Vec2,
        line: LineId,
        force_line: bool,
    ) -> Option<AreaId> {
        let mut best: Option<(f32, AreaId)> = None;
        for area in &self.areas {
            let Some(score) = self.score(area, origin, origin_pos, line, force_line) else {
                continue;
            };
            if best.is_none_or(|(s, _)| score < s) {
                best = Some((score, area.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Reserve a random free spot in the best area.  Returns the area's
    /// roadmap node and the reservation, or `None` when nothing can be
    /// offered.
    pub fn allocate(
        &mut self,
        origin: NodeId,
        origin_pos: Vec2,
        line: LineId,
        force_line: bool,
        rng: &mut SimRng,
    ) -> Option<(NodeId, SpotReservation)> {
        let id = self.best_area(origin, origin_pos, line, force_line)?;
        let area = self.areas.get_mut(id.index())?;
        let reservation = area.reserve(rng)?;
        Some((area.node, reservation))
    }

    pub fn release(&mut self, reservation: SpotReservation) -> StationResult<()> {
        match self.areas.get_mut(reservation.area().index()) {
            Some(area) => area.release(reservation),
            None => Err(StationError::UnknownArea(reservation)),
        }
    }

    pub fn spot_position(&self, reservation: &SpotReservation) -> Option<Vec2> {
        self.area(reservation.area())?.spot(reservation.spot())
    }

    /// Spots currently held across all areas.
    pub fn occupied_spots(&self) -> usize {
        self.areas.iter().map(WaitingArea::occupied_count).sum()
    }

    pub fn is_consistent(&self) -> bool {
        self.areas.iter().all(WaitingArea::is_consistent)
    }
}
