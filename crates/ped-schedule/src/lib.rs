//! `ped-schedule` — delayed continuations and agent emission.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`timer`]     | `TimerQueue<T>` (`BTreeMap<SimTime, Vec<T>>`)              |
//! | [`spawner`]   | `SpawnScheduler`, `SpawnerConfig`, `SpawnRate`, `LineFlow` |
//! | [`burst`]     | `Burst` (finite, evenly spaced emissions)                  |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Step model (summary)
//!
//! ```text
//! due = timers.drain_due(clock.now)
//! for entry in due: resume it (spawn, burst emission, boarding step...)
//!                   and push its follow-up, if any, at now + delay
//! ```

pub mod burst;
pub mod error;
pub mod spawner;
pub mod timer;

#[cfg(test)]
mod tests;

pub use burst::Burst;
pub use error::{ScheduleError, ScheduleResult};
pub use spawner::{LineFlow, SpawnRate, SpawnRequest, SpawnScheduler, SpawnerConfig, draw_line};
pub use timer::TimerQueue;
