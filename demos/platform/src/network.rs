//! Synthetic mixed-platform roadmap.
//!
//! A 30 m × 60 m floor: an island platform in the middle (`|x| < 3`), the
//! line 1 track on the `+x` side and the line 2 track on the `-x` side, and
//! a side platform beyond each track (`|x| > 6`).  Every platform runs from
//! an entrance at `z = -28` to an exit at `z = 28`.
//!
//! Node ids are assigned in insertion order; `scenario.toml` refers to them:
//!
//! | Ids     | Nodes                                                        |
//! |---------|--------------------------------------------------------------|
//! | 0–2     | entrances: island, right side, left side                     |
//! | 3–5     | exits: island, right side, left side                         |
//! | 6–10    | island spine, `z = -20 … 20`                                 |
//! | 11–15   | right side spine                                             |
//! | 16–20   | left side spine                                              |
//! | 21–24   | island waiting areas: line 1 at `z = -10, 10`, then line 2   |
//! | 25, 26  | side waiting areas: right (line 1), left (line 2)            |
//! | 27–29   | line 1 doors, `z = -10, 0, 10`                               |
//! | 30–32   | line 2 doors                                                 |

use ped_core::{NodeId, Vec2};
use ped_roadmap::{NodeShape, Roadmap, RoadmapBuilder, RoadmapResult};

const SPINE_Z: [f32; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];
const DOOR_Z: [f32; 3] = [-10.0, 0.0, 10.0];

const GATE: NodeShape = NodeShape::Ellipse { semi_x: 1.5, semi_z: 0.5, rotation: 0.0 };
const SPINE: NodeShape = NodeShape::Circle { radius: 1.0 };
const AREA: NodeShape = NodeShape::Circle { radius: 0.5 };
const DOOR: NodeShape = NodeShape::Ellipse { semi_x: 0.5, semi_z: 1.0, rotation: 0.0 };

/// Named nodes of the platform, mostly for reporting.
pub struct PlatformNodes {
    pub entrances: [NodeId; 3],
    pub exits: [NodeId; 3],
    pub areas: Vec<NodeId>,
    pub doors: [Vec<NodeId>; 2],
}

pub fn build_platform() -> RoadmapResult<(Roadmap, PlatformNodes)> {
    let mut b = RoadmapBuilder::new();

    let entrances = [0.0, 10.0, -10.0].map(|x| b.add_node(Vec2::new(x, -28.0), GATE));
    let exits = [0.0, 10.0, -10.0].map(|x| b.add_node(Vec2::new(x, 28.0), GATE));
    let spines = [0.0, 10.0, -10.0].map(|x| SPINE_Z.map(|z| b.add_node(Vec2::new(x, z), SPINE)));
    let [island, right, left] = spines;

    for ((entrance, exit), spine) in entrances.iter().zip(&exits).zip(&spines) {
        b.link(*entrance, spine[0]).link_chain(spine).link(spine[4], *exit);
    }

    // Island areas stay inside the yellow lines; side areas sit behind them.
    let mut areas = Vec::new();
    for x in [1.0, -1.0] {
        for (z, hub) in [(-10.0, island[1]), (10.0, island[3])] {
            let area = b.add_node(Vec2::new(x, z), AREA);
            b.link(area, hub);
            areas.push(area);
        }
    }
    for (x, hub) in [(9.0, right[2]), (-9.0, left[2])] {
        let area = b.add_node(Vec2::new(x, 0.0), AREA);
        b.link(area, hub);
        areas.push(area);
    }

    // Doors open onto the island and the side platform of their track.
    let mut doors = [Vec::new(), Vec::new()];
    for (side, (x, outer)) in [(4.5, right), (-4.5, left)].into_iter().enumerate() {
        for (i, z) in DOOR_Z.into_iter().enumerate() {
            let door = b.add_node(Vec2::new(x, z), DOOR);
            b.link(door, island[i + 1]).link(door, outer[i + 1]);
            doors[side].push(door);
        }
    }

    for n in entrances {
        b.mark_spawn(n);
    }
    for n in exits {
        b.mark_goal(n);
    }
    Ok((b.build()?, PlatformNodes { entrances, exits, areas, doors }))
}
