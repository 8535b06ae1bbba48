//! `ped-sim` — step loop orchestrator for the station crowd simulator.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps:
//!   ① Clock          — advance by one time step.
//!   ② Continuations  — drain timer entries due now:
//!                        Spawn(id)      → spawn an agent, reschedule the spawner
//!                        Station(task)  → alighting burst, begin approach, board
//!   ③ Trains         — every line controller: arrival timer, boarding
//!                      selection, dwell timer, departure sweep.
//!   ④ Field          — update density and velocity fields, solve.
//!   ⑤ Agents         — out-of-bounds removal, motion step for walkers,
//!                      passive step for standing agents, then resolve
//!                      agents that reached their target.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`sim`]      | `Sim`, `Continuation`                             |
//! | [`builder`]  | `SimBuilder`                                      |
//! | [`scenario`] | `ScenarioConfig` TOML loading                     |
//! | [`observer`] | `SimObserver` hooks, `NoopObserver`               |
//! | [`stats`]    | `SimStats` running totals                         |
//! | [`error`]    | `SimError`, `SimResult<T>`                        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ped_field::{GridLayout, StaggeredGrid};
//! use ped_sim::{NoopObserver, ScenarioConfig, SimBuilder};
//!
//! let scenario = ScenarioConfig::load("scenario.toml")?;
//! let layout = GridLayout::covering(30.0, 60.0, 1.0)?;
//! let mut sim = SimBuilder::from_scenario(scenario)
//!     .roadmap(roadmap)
//!     .field(StaggeredGrid::new(layout, 4.0)?)
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;
pub mod stats;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use scenario::ScenarioConfig;
pub use sim::{Continuation, Sim};
pub use stats::SimStats;
