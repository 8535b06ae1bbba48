//! Scenario files.
//!
//! A scenario is one TOML document; every table is optional and falls back
//! to its defaults:
//!
//! ```toml
//! [sim]
//! time_step_secs = 0.05
//! total_steps    = 2400
//! seed           = 7
//!
//! [motion]
//! smooth_turns = true
//!
//! [station]
//! platform = "mixed"
//!
//! [[station.areas]]
//! node = 4
//! size = [4.0, 2.0]
//!
//! [[station.lines]]
//! line  = 1
//! doors = [7, 8]
//! dwell_secs = 20.0
//!
//! [[spawners]]
//! node = 0
//! rate = { kind = "poisson", rate_per_sec = 0.5 }
//! flow = { kind = "asymmetric" }
//! ```
//!
//! Node ids refer to the roadmap the scenario is run against.

use std::path::Path;

use ped_agent::MotionConfig;
use ped_core::SimConfig;
use ped_schedule::SpawnerConfig;
use ped_station::StationConfig;

use crate::SimResult;

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub sim: SimConfig,
    pub motion: MotionConfig,
    pub station: StationConfig,
    pub spawners: Vec<SpawnerConfig>,
}

impl ScenarioConfig {
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
