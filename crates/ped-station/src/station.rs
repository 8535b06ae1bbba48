//! The station: waiting areas, the allocator, and one controller per line.
//!
//! Train operations never block.  Anything that should happen later (the
//! next alighting passenger, a selected agent starting to walk, a preparing
//! agent stepping on board) is handed back to the caller as a [`Scheduled`]
//! task; the simulation keeps those in its timer queue and feeds each one
//! back through [`Station::run_task`] when it is due.  Every task re-checks
//! that its agent still exists and is still in the expected state, so a task
//! whose agent was removed in the meantime does nothing.

use ped_agent::{AgentState, AgentStore, EdgeGuard, PlatformType};
use ped_core::{AgentId, LineId, NodeId, SimRng, SimTime, SpotReservation, Vec2};
use ped_roadmap::{LineOfSight, Roadmap};

use crate::{
    AllocatorWeights, LineConfig, LineController, StationError, StationResult, WaitingArea,
    WaitingAreaAllocator, WaitingAreaConfig,
};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StationConfig {
    pub platform: PlatformType,
    pub allocator: AllocatorWeights,
    pub areas: Vec<WaitingAreaConfig>,
    pub lines: Vec<LineConfig>,
}

// ── Tasks and events ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StationTask {
    /// Next passenger off at door `door` of `line`, for the train of `cycle`.
    AlightBurst { line: LineId, door: usize, cycle: u32 },
    /// A selected agent starts walking to its door.
    BeginApproach { agent: AgentId },
    /// A preparing agent steps on board.
    Board { agent: AgentId, line: LineId },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub at: SimTime,
    pub task: StationTask,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StationEvent {
    TrainArrived { line: LineId },
    TrainDeparted { line: LineId, departed: usize, stranded: usize },
    Alighted { agent: AgentId, line: LineId },
    Boarded { agent: AgentId, line: LineId },
}

/// Follow-up work and notable events produced by one station call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub scheduled: Vec<Scheduled>,
    pub events: Vec<StationEvent>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.events.is_empty()
    }

    pub fn extend(&mut self, other: Outcome) {
        self.scheduled.extend(other.scheduled);
        self.events.extend(other.events);
    }
}

/// Mutable world state a station call may touch.
pub struct StationContext<'a, S: LineOfSight + ?Sized> {
    pub now: SimTime,
    pub agents: &'a mut AgentStore,
    pub roadmap: &'a Roadmap,
    pub sight: &'a S,
    pub rng: &'a mut SimRng,
    /// Walking speed range for alighting passengers, m/s.
    pub speed_range: (f32, f32),
}

// ── Station ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Station {
    allocator: WaitingAreaAllocator,
    lines: Vec<LineController>,
    edges: EdgeGuard,
}

impl Station {
    /// Build every waiting area and line controller against `roadmap`.
    /// Allocator distances are precomputed from the roadmap's spawn nodes.
    pub fn new(config: StationConfig, roadmap: &Roadmap) -> StationResult<Self> {
        let mut areas = Vec::with_capacity(config.areas.len());
        for (i, cfg) in config.areas.iter().enumerate() {
            let id = ped_core::AreaId(i as u32);
            let position = roadmap.position(cfg.node).map_err(|_| StationError::UnknownNode(cfg.node))?;
            areas.push(WaitingArea::new(id, position, cfg)?);
        }
        let origins = roadmap
            .spawns
            .iter()
            .filter_map(|&n| roadmap.position(n).ok().map(|p| (n, p)));
        let allocator = WaitingAreaAllocator::new(areas, config.allocator, origins);

        let mut lines: Vec<LineController> = Vec::with_capacity(config.lines.len());
        for cfg in config.lines {
            if lines.iter().any(|l| l.line == cfg.line) {
                return Err(StationError::DuplicateLine(cfg.line));
            }
            lines.push(LineController::new(cfg, roadmap)?);
        }
        log::info!(
            "station: {:?} platform, {} waiting areas ({} spots), {} lines",
            config.platform,
            allocator.len(),
            allocator.areas().iter().map(WaitingArea::total).sum::<usize>(),
            lines.len()
        );
        Ok(Self { allocator, lines, edges: EdgeGuard::new(config.platform) })
    }

    pub fn allocator(&self) -> &WaitingAreaAllocator {
        &self.allocator
    }

    pub fn lines(&self) -> &[LineController] {
        &self.lines
    }

    pub fn line(&self, line: LineId) -> Option<&LineController> {
        self.lines.iter().find(|l| l.line == line)
    }

    fn line_mut(&mut self, line: LineId) -> Option<&mut LineController> {
        self.lines.iter_mut().find(|l| l.line == line)
    }

    /// Platform edges with the currently dwelling lines unguarded.
    pub fn edges(&self) -> &EdgeGuard {
        &self.edges
    }

    // ── Waiting spots ─────────────────────────────────────────────────────

    pub fn allocate(
        &mut self,
        origin: NodeId,
        origin_pos: Vec2,
        line: LineId,
        force_line: bool,
        rng: &mut SimRng,
    ) -> Option<(NodeId, SpotReservation)> {
        self.allocator.allocate(origin, origin_pos, line, force_line, rng)
    }

    pub fn release(&mut self, reservation: SpotReservation) -> StationResult<()> {
        self.allocator.release(reservation)
    }

    pub fn spot_position(&self, reservation: &SpotReservation) -> Option<Vec2> {
        self.allocator.spot_position(reservation)
    }

    /// Position of the door of `line` nearest to `p`.
    pub fn nearest_door(&self, line: LineId, p: Vec2) -> Option<Vec2> {
        self.line(line)?.nearest_door(p).map(|d| d.position)
    }

    // ── Step ──────────────────────────────────────────────────────────────

    /// Advance every line by `dt`.
    pub fn update<S: LineOfSight + ?Sized>(&mut self, dt: f32, ctx: &mut StationContext<'_, S>) -> Outcome {
        let mut out = Outcome::default();
        for line in &mut self.lines {
            line.update(dt, ctx, &mut self.allocator, &mut out);
        }
        self.edges.dwelling = self.lines.iter().filter(|l| l.is_dwelling()).map(|l| l.line).collect();
        out
    }

    /// Resume a scheduled task.
    pub fn run_task<S: LineOfSight + ?Sized>(
        &mut self,
        task: StationTask,
        ctx: &mut StationContext<'_, S>,
    ) -> Outcome {
        let mut out = Outcome::default();
        match task {
            StationTask::AlightBurst { line, door, cycle } => {
                if let Some(controller) = self.line_mut(line) {
                    controller.alight_one(door, cycle, ctx, &mut out);
                }
            }
            StationTask::BeginApproach { agent } => {
                if let Some(a) = ctx.agents.get_mut(agent) {
                    if let AgentState::PreparingToBoard { moving, .. } = &mut a.state {
                        *moving = true;
                    }
                }
            }
            StationTask::Board { agent, line } => {
                if let Some(event) = board(agent, line, ctx.agents) {
                    out.events.push(event);
                }
            }
        }
        out
    }
}

/// Take a preparing agent of `line` on board: it leaves the field and stays
/// on the train until the train departs.
pub fn board(id: AgentId, line: LineId, agents: &mut AgentStore) -> Option<StationEvent> {
    let agent = agents.get_mut(id)?;
    if !matches!(agent.state, AgentState::PreparingToBoard { line: l, .. } if l == line) {
        return None;
    }
    agent.reset_motion();
    agent.coupling = None;
    agent.state = AgentState::Boarded { line };
    Some(StationEvent::Boarded { agent: id, line })
}
