//! Station roadmap and builder.
//!
//! # Data layout
//!
//! Node attributes are stored as parallel vectors indexed by `NodeId`.
//! Links are undirected walkways; `build()` turns them into directed edges in
//! **Compressed Sparse Row (CSR)** order, so the outgoing edges of node `n`
//! are the contiguous slice
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Station roadmaps are small (tens to a few hundred nodes), so `build()`
//! also runs Dijkstra from every node and keeps the predecessor tables:
//! any `shortest_path(from, to)` afterwards is a table walk.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over node positions answers "nearest node I can
//! see from here" by walking neighbours in ascending distance until the
//! line-of-sight oracle accepts one.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ped_core::{NodeId, Vec2};

use crate::paths::{PathTable, all_pairs};
use crate::shape::{self, NodeShape};
use crate::{LineOfSight, RoadmapError, RoadmapResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [x, z]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

// ── Roadmap ───────────────────────────────────────────────────────────────────

/// Walkable graph of the station floor.  Build with [`RoadmapBuilder`].
pub struct Roadmap {
    // ── Node data ─────────────────────────────────────────────────────────
    pub node_pos: Vec<Vec2>,
    pub node_shape: Vec<NodeShape>,

    /// Nodes agents can be spawned at.
    pub spawns: Vec<NodeId>,
    /// Exit nodes; reaching one ends an agent's trip.
    pub goals: Vec<NodeId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    pub node_out_start: Vec<u32>,
    pub edge_to: Vec<NodeId>,
    pub edge_length_m: Vec<f32>,

    paths: PathTable,
    spatial_idx: RTree<NodeEntry>,
}

impl Roadmap {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Position of `node`, or `NodeNotFound`.
    pub fn position(&self, node: NodeId) -> RoadmapResult<Vec2> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(RoadmapError::NodeNotFound(node))
    }

    /// Outgoing `(neighbour, length)` pairs of `node`.
    pub fn neighbours(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f32)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|e| (self.edge_to[e], self.edge_length_m[e]))
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// Node sequence from `from` to `to`, both included.
    ///
    /// `from == to` yields the one-node path `[from]`.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> RoadmapResult<Vec<NodeId>> {
        for node in [from, to] {
            if !self.contains_node(node) {
                return Err(RoadmapError::NodeNotFound(node));
            }
        }
        self.paths.path(from, to).ok_or(RoadmapError::NoPath { from, to })
    }

    /// Walking distance along the shortest path, `None` if unreachable.
    pub fn path_length(&self, from: NodeId, to: NodeId) -> Option<f32> {
        if !(self.contains_node(from) && self.contains_node(to)) {
            return None;
        }
        self.paths.distance(from, to)
    }

    // ── Node shapes ───────────────────────────────────────────────────────

    /// Point an agent at `from` should aim at to reach `node`.
    pub fn target_point(&self, node: NodeId, from: Vec2) -> RoadmapResult<Vec2> {
        let center = self.position(node)?;
        Ok(shape::target_point(&self.node_shape[node.index()], center, from))
    }

    /// `true` if `point` is inside the capture zone of `node`.
    pub fn contains_point(&self, node: NodeId, point: Vec2) -> bool {
        match self.node_pos.get(node.index()) {
            Some(&center) => shape::contains_point(&self.node_shape[node.index()], center, point),
            None => false,
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `p` regardless of visibility.
    pub fn nearest_node(&self, p: Vec2) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&[p.x, p.y]).map(|e| e.id)
    }

    /// Nearest node whose centre is visible from `p`, or `None` if every
    /// node is occluded.
    pub fn nearest_visible_node<S: LineOfSight + ?Sized>(&self, p: Vec2, sight: &S) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[p.x, p.y])
            .find(|e| sight.visible(p, Vec2::new(e.point[0], e.point[1])))
            .map(|e| e.id)
    }

    /// Goal node with the shortest straight-line distance to `p`.
    pub fn closest_goal(&self, p: Vec2) -> Option<NodeId> {
        self.goals.iter().copied().min_by(|&a, &b| {
            let da = distance2(self.node_pos[a.index()], p);
            let db = distance2(self.node_pos[b.index()], p);
            da.total_cmp(&db)
        })
    }
}

#[inline]
fn distance2(a: Vec2, b: Vec2) -> f32 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}

// ── RoadmapBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Roadmap`] incrementally, then call [`build`](Self::build).
///
/// ```
/// use ped_core::Vec2;
/// use ped_roadmap::{NodeShape, RoadmapBuilder};
///
/// let mut b = RoadmapBuilder::new();
/// let a = b.add_node(Vec2::new(0.0, 0.0), NodeShape::default());
/// let c = b.add_node(Vec2::new(0.0, 10.0), NodeShape::default());
/// b.link(a, c);
/// b.mark_spawn(a);
/// b.mark_goal(c);
/// let map = b.build().unwrap();
/// assert_eq!(map.shortest_path(a, c).unwrap(), vec![a, c]);
/// ```
pub struct RoadmapBuilder {
    positions: Vec<Vec2>,
    shapes: Vec<NodeShape>,
    links: Vec<(NodeId, NodeId)>,
    spawns: Vec<NodeId>,
    goals: Vec<NodeId>,
}

impl RoadmapBuilder {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            shapes: Vec::new(),
            links: Vec::new(),
            spawns: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, position: Vec2, shape: NodeShape) -> NodeId {
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(position);
        self.shapes.push(shape);
        id
    }

    /// Add an undirected walkway between `a` and `b`; its length is the
    /// straight-line distance between the node centres.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> &mut Self {
        self.links.push((a, b));
        self
    }

    /// Link consecutive nodes of `chain`.
    pub fn link_chain(&mut self, chain: &[NodeId]) -> &mut Self {
        for pair in chain.windows(2) {
            self.links.push((pair[0], pair[1]));
        }
        self
    }

    pub fn mark_spawn(&mut self, node: NodeId) -> &mut Self {
        self.spawns.push(node);
        self
    }

    pub fn mark_goal(&mut self, node: NodeId) -> &mut Self {
        self.goals.push(node);
        self
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    /// Validate, build the CSR adjacency, precompute all shortest paths, and
    /// bulk-load the R-tree.
    pub fn build(self) -> RoadmapResult<Roadmap> {
        let n = self.positions.len();
        let check = |id: NodeId| {
            if id.index() < n { Ok(()) } else { Err(RoadmapError::NodeNotFound(id)) }
        };
        for &(a, b) in &self.links {
            check(a)?;
            check(b)?;
        }
        for &id in self.spawns.iter().chain(&self.goals) {
            check(id)?;
        }
        for (i, s) in self.shapes.iter().enumerate() {
            if let Some(reason) = s.degeneracy() {
                return Err(RoadmapError::InvalidShape { node: NodeId(i as u32), reason });
            }
        }

        // Both directions of every link, sorted by source for CSR.
        let mut raw: Vec<(NodeId, NodeId, f32)> = Vec::with_capacity(self.links.len() * 2);
        for &(a, b) in &self.links {
            let len = distance2(self.positions[a.index()], self.positions[b.index()]).sqrt();
            raw.push((a, b, len));
            raw.push((b, a, len));
        }
        raw.sort_unstable_by_key(|e| (e.0, e.1));
        raw.dedup_by_key(|e| (e.0, e.1));

        let mut node_out_start = vec![0u32; n + 1];
        for e in &raw {
            node_out_start[e.0.index() + 1] += 1;
        }
        for i in 1..=n {
            node_out_start[i] += node_out_start[i - 1];
        }
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_length_m: Vec<f32> = raw.iter().map(|e| e.2).collect();

        let paths = all_pairs(n, &node_out_start, &edge_to, &edge_length_m);

        let entries: Vec<NodeEntry> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::debug!("roadmap built: {} nodes, {} directed edges", n, edge_to.len());

        Ok(Roadmap {
            node_pos: self.positions,
            node_shape: self.shapes,
            spawns: self.spawns,
            goals: self.goals,
            node_out_start,
            edge_to,
            edge_length_m,
            paths,
            spatial_idx,
        })
    }
}

impl Default for RoadmapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
