use ped_core::{AreaId, LineId, NodeId, SpotReservation};
use ped_roadmap::RoadmapError;
use ped_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("{area}: {reason}")]
    InvalidArea { area: AreaId, reason: String },

    #[error("reservation {0} names no registered waiting area")]
    UnknownArea(SpotReservation),

    #[error("reservation {0} points at a free spot")]
    SpotNotOccupied(SpotReservation),

    #[error("{0} has no doors")]
    NoDoors(LineId),

    #[error("{0} is configured twice")]
    DuplicateLine(LineId),

    #[error("{0} is not a roadmap node")]
    UnknownNode(NodeId),

    #[error("roadmap error: {0}")]
    Roadmap(#[from] RoadmapError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}

pub type StationResult<T> = Result<T, StationError>;
