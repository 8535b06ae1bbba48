use ped_core::PedError;
use ped_schedule::ScheduleError;
use ped_station::StationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] PedError),

    #[error("no {0} supplied to the builder")]
    MissingCollaborator(&'static str),

    #[error("station setup failed: {0}")]
    Station(#[from] StationError),

    #[error("spawner setup failed: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("scenario file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
