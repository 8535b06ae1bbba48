//! Continuous spawners.
//!
//! Each spawner sits on a roadmap spawn node and emits one agent per firing.
//! The scheduler only decides *when* and *what kind* of agent; creating the
//! agent, reserving a waiting spot and routing it is the simulation's job.
//!
//! # Timing
//!
//! | Rate      | Gap between firings                                 |
//! |-----------|-----------------------------------------------------|
//! | `Fixed`   | exactly `interval_secs`                             |
//! | `Poisson` | `Exp(rate_per_sec)` sample, i.e. `-ln(1 - u) / λ`   |
//!
//! The first firing happens one gap after the run starts, never at time 0.

use rand_distr::Exp;

use ped_core::{LineId, NodeId, SimRng, SimTime, SpawnerId, Vec2};

use crate::{ScheduleError, ScheduleResult};

/// Share of agents sent to line 1 under [`LineFlow::Asymmetric`].
pub const ASYMMETRIC_LINE_ONE_SHARE: f64 = 0.20;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum SpawnRate {
    /// One agent every `interval_secs`.
    Fixed { interval_secs: f32 },
    /// Poisson process with `rate_per_sec` expected agents per second.
    Poisson { rate_per_sec: f32 },
}

/// How spawned agents are split over train lines.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum LineFlow {
    /// Line 1 or 2 with equal probability.
    #[default]
    Symmetric,
    /// 20 % line 1, 80 % line 2.
    Asymmetric,
    /// Always `line`; waiting areas on the other side are never offered.
    Fixed { line: LineId },
    /// Agents take no train and walk straight to their goal.
    None,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnerConfig {
    /// Roadmap node the spawner sits on.
    pub node: NodeId,
    pub rate: SpawnRate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flow: LineFlow,
    /// Goal override; defaults to the roadmap's first goal node.
    #[cfg_attr(feature = "serde", serde(default))]
    pub goal: Option<NodeId>,
    /// Spawn positions are jittered by up to this much on both axes.
    #[cfg_attr(feature = "serde", serde(default = "default_jitter"))]
    pub jitter: f32,
}

#[cfg(feature = "serde")]
fn default_jitter() -> f32 {
    0.5
}

impl SpawnerConfig {
    pub fn new(node: NodeId, rate: SpawnRate) -> Self {
        Self { node, rate, flow: LineFlow::default(), goal: None, jitter: 0.5 }
    }

    pub fn with_flow(mut self, flow: LineFlow) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_goal(mut self, goal: NodeId) -> Self {
        self.goal = Some(goal);
        self
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

enum Gap {
    Fixed(f32),
    Poisson(Exp<f32>),
}

impl Gap {
    fn sample(&self, rng: &mut SimRng) -> f32 {
        match self {
            Gap::Fixed(secs) => *secs,
            Gap::Poisson(exp) => rng.sample(exp),
        }
    }
}

/// What a spawner firing asks the simulation to create.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    pub spawner: SpawnerId,
    pub node: NodeId,
    /// Offset from the spawn node's position.
    pub offset: Vec2,
    pub line: Option<LineId>,
    /// Only waiting areas on `line`'s side may be offered.
    pub force_line: bool,
    /// `None` means "the roadmap's default goal".
    pub goal: Option<NodeId>,
}

/// All continuous spawners of a scenario.
pub struct SpawnScheduler {
    configs: Vec<SpawnerConfig>,
    gaps: Vec<Gap>,
}

impl SpawnScheduler {
    /// Validate the configs.  Non-positive or non-finite rates are rejected.
    pub fn new(configs: Vec<SpawnerConfig>) -> ScheduleResult<Self> {
        let mut gaps = Vec::with_capacity(configs.len());
        for (i, cfg) in configs.iter().enumerate() {
            let spawner = SpawnerId(i as u32);
            let gap = match cfg.rate {
                SpawnRate::Fixed { interval_secs } if interval_secs.is_finite() && interval_secs > 0.0 => {
                    Gap::Fixed(interval_secs)
                }
                SpawnRate::Fixed { interval_secs } => {
                    return Err(ScheduleError::InvalidRate {
                        spawner,
                        reason: format!("interval must be positive, got {interval_secs}"),
                    });
                }
                SpawnRate::Poisson { rate_per_sec } => {
                    let exp = Exp::new(rate_per_sec)
                        .ok()
                        .filter(|_| rate_per_sec.is_finite() && rate_per_sec > 0.0)
                        .ok_or_else(|| ScheduleError::InvalidRate {
                            spawner,
                            reason: format!("Poisson rate must be positive, got {rate_per_sec}"),
                        })?;
                    Gap::Poisson(exp)
                }
            };
            log::debug!("{spawner}: node {} rate {:?} flow {:?}", cfg.node, cfg.rate, cfg.flow);
            gaps.push(gap);
        }
        Ok(Self { configs, gaps })
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Seconds until spawner `id` fires again.
    pub fn next_gap(&self, id: SpawnerId, rng: &mut SimRng) -> f32 {
        self.gaps.get(id.index()).map_or(f32::INFINITY, |g| g.sample(rng))
    }

    /// First firing time of every spawner, starting from `now`.
    pub fn initial_deadlines(&self, now: SimTime, rng: &mut SimRng) -> Vec<(SimTime, SpawnerId)> {
        (0..self.configs.len())
            .map(|i| {
                let id = SpawnerId(i as u32);
                (now.after_secs(self.next_gap(id, rng)), id)
            })
            .collect()
    }

    /// Draw the agent spawner `id` emits now.
    pub fn request(&self, id: SpawnerId, rng: &mut SimRng) -> Option<SpawnRequest> {
        let cfg = self.configs.get(id.index())?;
        let (line, force_line) = draw_line(cfg.flow, rng);
        Some(SpawnRequest {
            spawner: id,
            node: cfg.node,
            offset: rng.jitter(cfg.jitter),
            line,
            force_line,
            goal: cfg.goal,
        })
    }
}

/// Pick a line according to `flow`; the flag is `true` for fixed flows.
pub fn draw_line(flow: LineFlow, rng: &mut SimRng) -> (Option<LineId>, bool) {
    match flow {
        LineFlow::Symmetric => (Some(LineId(rng.gen_range(1..=2u8))), false),
        LineFlow::Asymmetric => {
            let line = if rng.gen_bool(ASYMMETRIC_LINE_ONE_SHARE) { 1 } else { 2 };
            (Some(LineId(line)), false)
        }
        LineFlow::Fixed { line } => (Some(line), true),
        LineFlow::None => (None, false),
    }
}
