//! All-pairs shortest paths over the roadmap.
//!
//! Dijkstra runs once from every node at build time.  Costs are integer
//! millimetres so the heap key is totally ordered; the secondary `NodeId`
//! key makes tie-breaking deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ped_core::NodeId;

/// Row-major `n × n` predecessor and distance tables.
pub(crate) struct PathTable {
    n: usize,
    /// `prev[src * n + v]` = node before `v` on the best path from `src`.
    prev: Vec<NodeId>,
    /// `dist_mm[src * n + v]`, `u32::MAX` when unreachable.
    dist_mm: Vec<u32>,
}

impl PathTable {
    pub(crate) fn distance(&self, from: NodeId, to: NodeId) -> Option<f32> {
        let d = self.dist_mm[from.index() * self.n + to.index()];
        (d != u32::MAX).then(|| d as f32 / 1000.0)
    }

    pub(crate) fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let row = from.index() * self.n;
        if self.dist_mm[row + to.index()] == u32::MAX {
            return None;
        }
        let mut nodes = vec![to];
        let mut cur = to;
        while cur != from {
            cur = self.prev[row + cur.index()];
            nodes.push(cur);
        }
        nodes.reverse();
        Some(nodes)
    }
}

pub(crate) fn all_pairs(
    n: usize,
    node_out_start: &[u32],
    edge_to: &[NodeId],
    edge_length_m: &[f32],
) -> PathTable {
    let edge_mm: Vec<u32> = edge_length_m.iter().map(|&m| (m * 1000.0).round() as u32).collect();
    let mut prev = vec![NodeId::INVALID; n * n];
    let mut dist_mm = vec![u32::MAX; n * n];

    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    for src in 0..n {
        let row = src * n;
        let dist = &mut dist_mm[row..row + n];
        let prev = &mut prev[row..row + n];
        dist[src] = 0;
        heap.clear();
        heap.push(Reverse((0, NodeId(src as u32))));

        while let Some(Reverse((cost, node))) = heap.pop() {
            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }
            let start = node_out_start[node.index()] as usize;
            let end = node_out_start[node.index() + 1] as usize;
            for e in start..end {
                let next = edge_to[e];
                let new_cost = cost.saturating_add(edge_mm[e]);
                if new_cost < dist[next.index()] {
                    dist[next.index()] = new_cost;
                    prev[next.index()] = node;
                    heap.push(Reverse((new_cost, next)));
                }
            }
        }
    }

    PathTable { n, prev, dist_mm }
}
