//! `ped-field` — crowd field contract and agent ↔ field coupling.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`layout`]   | `GridLayout`, `Cell`, `Face`                               |
//! | [`field`]    | `CrowdField` trait (density, staggered velocity, solve)    |
//! | [`coupling`] | `Coupling`: inverse-bilinear weights, sample and splat     |
//! | [`grid`]     | `StaggeredGrid`, a dense pass-through `CrowdField`         |
//! | [`error`]    | `FieldError`, `FieldResult<T>`                             |

pub mod coupling;
pub mod error;
pub mod field;
pub mod grid;
pub mod layout;


pub use coupling::Coupling;
pub use error::{FieldError, FieldResult};
pub use field::CrowdField;
pub use grid::StaggeredGrid;
pub use layout::{Cell, Face, GridLayout};
