//! Fluent builder for constructing a [`Sim`].

use ped_agent::{AgentStore, MotionConfig};
use ped_core::{SimClock, SimConfig, SimRng};
use ped_field::CrowdField;
use ped_roadmap::{LineOfSight, OpenFloor, Roadmap};
use ped_schedule::{SpawnScheduler, SpawnerConfig, TimerQueue};
use ped_station::{Station, StationConfig};

use crate::{Continuation, ScenarioConfig, Sim, SimError, SimResult, SimStats};

/// Fluent builder for [`Sim<F, S>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: step length, seed, floor size, speed range, …
/// - [`Roadmap`]: via [`.roadmap(r)`](Self::roadmap)
/// - `F: CrowdField`: via [`.field(f)`](Self::field)
/// - [`StationConfig`]: via [`.station(c)`](Self::station)
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                   |
/// |--------------------|---------------------------|
/// | `.sight(s)`        | `OpenFloor` (no walls)    |
/// | `.motion(m)`       | `MotionConfig::default()` |
/// | `.spawners(v)`     | none                      |
///
/// # Example
///
/// ```rust,ignore
/// let scenario = ScenarioConfig::load("scenario.toml")?;
/// let layout = GridLayout::covering(30.0, 60.0, 1.0)?;
/// let mut sim = SimBuilder::from_scenario(scenario)
///     .roadmap(roadmap)
///     .field(StaggeredGrid::new(layout, 4.0)?)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<F: CrowdField, S: LineOfSight> {
    config:   SimConfig,
    motion:   MotionConfig,
    roadmap:  Option<Roadmap>,
    field:    Option<F>,
    sight:    S,
    station:  Option<StationConfig>,
    spawners: Vec<SpawnerConfig>,
}

impl<F: CrowdField> SimBuilder<F, OpenFloor> {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            motion:   MotionConfig::default(),
            roadmap:  None,
            field:    None,
            sight:    OpenFloor,
            station:  None,
            spawners: Vec::new(),
        }
    }

    /// Start from every table of a scenario file.
    pub fn from_scenario(scenario: ScenarioConfig) -> Self {
        Self::new(scenario.sim)
            .motion(scenario.motion)
            .station(scenario.station)
            .spawners(scenario.spawners)
    }
}

impl<F: CrowdField, S: LineOfSight> SimBuilder<F, S> {
    pub fn roadmap(mut self, roadmap: Roadmap) -> Self {
        self.roadmap = Some(roadmap);
        self
    }

    pub fn field(mut self, field: F) -> Self {
        self.field = Some(field);
        self
    }

    /// Replace the visibility test used for path-node skipping and door
    /// routing.
    pub fn sight<S2: LineOfSight>(self, sight: S2) -> SimBuilder<F, S2> {
        SimBuilder {
            config:   self.config,
            motion:   self.motion,
            roadmap:  self.roadmap,
            field:    self.field,
            sight,
            station:  self.station,
            spawners: self.spawners,
        }
    }

    pub fn station(mut self, station: StationConfig) -> Self {
        self.station = Some(station);
        self
    }

    pub fn motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn spawners(mut self, spawners: Vec<SpawnerConfig>) -> Self {
        self.spawners = spawners;
        self
    }

    /// Validate inputs, build the station and spawners, seed the timer queue
    /// with every spawner's first firing, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<F, S>> {
        let roadmap = self.roadmap.ok_or(SimError::MissingCollaborator("roadmap"))?;
        let field = self.field.ok_or(SimError::MissingCollaborator("crowd field"))?;
        let station = self.station.ok_or(SimError::MissingCollaborator("station configuration"))?;

        // ── Validate ──────────────────────────────────────────────────────
        let config = self.config;
        config.validate()?;
        for s in &self.spawners {
            if !roadmap.contains_node(s.node) {
                return Err(SimError::Config(format!("spawner node {} is not on the roadmap", s.node)));
            }
            if let Some(goal) = s.goal {
                if !roadmap.contains_node(goal) {
                    return Err(SimError::Config(format!("spawner goal {goal} is not on the roadmap")));
                }
            }
        }

        // ── Collaborators ─────────────────────────────────────────────────
        let station = Station::new(station, &roadmap)?;
        let spawners = SpawnScheduler::new(self.spawners)?;
        let mut rng = SimRng::new(config.seed);
        let clock = SimClock::new();

        let mut timers = TimerQueue::new();
        for (at, id) in spawners.initial_deadlines(clock.now, &mut rng) {
            timers.push(at, Continuation::Spawn(id));
        }
        log::info!(
            "sim: {} steps of {} s, {} spawners, seed {}",
            config.total_steps,
            config.time_step_secs,
            spawners.len(),
            config.seed
        );

        Ok(Sim {
            config,
            motion: self.motion,
            clock,
            rng,
            agents: AgentStore::new(),
            roadmap,
            field,
            sight: self.sight,
            station,
            spawners,
            timers,
            stats: SimStats::default(),
        })
    }
}
