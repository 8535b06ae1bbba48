//! `ped-roadmap` — walkable station graph, capture shapes, and visibility.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Roadmap` (CSR + all-pairs paths + R-tree), `RoadmapBuilder` |
//! | [`shape`]   | `NodeShape`, `contains_point`, `target_point`               |
//! | [`sight`]   | `LineOfSight` trait, `OpenFloor`, `Walls`                   |
//! | [`error`]   | `RoadmapError`, `RoadmapResult<T>`                          |

pub mod error;
pub mod network;
mod paths;
pub mod shape;
pub mod sight;

#[cfg(test)]
mod tests;

pub use error::{RoadmapError, RoadmapResult};
pub use network::{Roadmap, RoadmapBuilder};
pub use shape::NodeShape;
pub use sight::{LineOfSight, OpenFloor, Walls};
