//! `ped-core` — foundational types for the station crowd simulator.
//!
//! This crate is a dependency of every other `ped-*` crate and has no
//! `ped-*` dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `AreaId`, `SpawnerId`, `LineId`, `AgentId`  |
//! | [`geo`]         | `Vec2`, `Rect`, turning helpers                       |
//! | [`time`]        | `SimTime`, `SimClock`, `SimConfig`                    |
//! | [`rng`]         | `SimRng`                                              |
//! | [`reservation`] | `SpotReservation` (move-only waiting-spot token)      |
//! | [`error`]       | `PedError`, `PedResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SimConfig`.     |

pub mod error;
pub mod geo;
pub mod ids;
pub mod reservation;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PedError, PedResult};
pub use geo::{Rect, Vec2};
pub use ids::{AgentId, AreaId, LineId, NodeId, SpawnerId};
pub use reservation::SpotReservation;
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime};

pub use cgmath;
