use thiserror::Error;

use ped_core::SpawnerId;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("{spawner}: {reason}")]
    InvalidRate { spawner: SpawnerId, reason: String },

    #[error("burst interval must be non-negative, got {0}")]
    InvalidBurst(f32),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
