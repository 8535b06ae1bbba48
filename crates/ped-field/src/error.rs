//! Field-subsystem error type.

use thiserror::Error;

/// Errors produced by `ped-field`.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("cell length must be positive and finite, got {0}")]
    InvalidCellLength(f32),

    #[error("grid must have at least one cell, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("max density must be positive, got {0}")]
    InvalidMaxDensity(f32),
}

pub type FieldResult<T> = Result<T, FieldError>;
