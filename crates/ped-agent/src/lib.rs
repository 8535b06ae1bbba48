//! `ped-agent` — agent state, storage, and the motion model.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`agent`]  | `Agent`, `AgentState`, `Navigation`                          |
//! | [`store`]  | `AgentStore` (generational `SlotMap`)                        |
//! | [`motion`] | `MotionConfig`, `MotionContext`, `step`, `passive_step`      |
//! | [`edge`]   | `PlatformType`, `EdgeZone`, `EdgeGuard`, yellow-line force   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `MotionConfig` and `PlatformType`. |

pub mod agent;
pub mod edge;
pub mod motion;
pub mod store;


pub use agent::{Agent, AgentState, Navigation};
pub use edge::{EdgeGuard, EdgeZone, PlatformType, yellow_line_force};
pub use motion::{MotionConfig, MotionContext};
pub use store::AgentStore;
