//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `PedError` with
//! `#[from]` where a core check can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PedError {
    #[error("invalid simulation config: {0}")]
    Config(String),
}

/// Shorthand result type for `ped-core` checks.
pub type PedResult<T> = Result<T, PedError>;
