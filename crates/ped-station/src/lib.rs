//! `ped-station` — waiting areas, spot allocation, and train operations.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`waiting`]   | `WaitingArea` spot pool, `WaitingAreaConfig`, `SpotLayout` |
//! | [`allocator`] | `WaitingAreaAllocator`, `AllocatorWeights`                 |
//! | [`line`]      | `LineController` per train line, `LineConfig`, `Door`      |
//! | [`recovery`]  | end-of-dwell sweep of boarded, stranded and alighting agents |
//! | [`station`]   | `Station`, `StationTask`, `StationEvent`, `Outcome`        |
//! | [`error`]     | `StationError`, `StationResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all configuration types. |

pub mod allocator;
pub mod error;
pub mod line;
pub mod recovery;
pub mod station;
pub mod waiting;

#[cfg(test)]
mod tests;

pub use allocator::{AllocatorWeights, WaitingAreaAllocator};
pub use error::{StationError, StationResult};
pub use line::{Door, LineConfig, LineController, LinePhase, LineTiming};
pub use recovery::RecoveryReport;
pub use station::{Outcome, Scheduled, Station, StationConfig, StationContext, StationEvent, StationTask, board};
pub use waiting::{SpotLayout, WaitingArea, WaitingAreaConfig};
