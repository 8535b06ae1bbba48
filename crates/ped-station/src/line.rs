//! Per-line train operations.
//!
//! # Cycle
//!
//! ```text
//!            arrival timer ≥ interval (and enough agents on the floor)
//!   Idle ─────────────────────────────────────────────► Arrived
//!    ▲                                                    │ doors start alighting,
//!    │                                                    │ line's agents pulled in
//!    │                                                    ▼
//!    │                                            PreparingToBoard
//!    │                                                    │ every door burst done
//!    │                                                    ▼
//!    └──────────── dwell timer ≥ dwell_secs ───────── Boarding
//! ```
//!
//! The dwell timer runs from arrival regardless of phase; when it expires the
//! train leaves and [`recovery::sweep`](crate::recovery::sweep) cleans up
//! whatever did not make it.

use ped_agent::{Agent, AgentState};
use ped_core::cgmath::MetricSpace;
use ped_core::{AgentId, LineId, NodeId, Vec2};
use ped_roadmap::{LineOfSight, Roadmap};
use ped_schedule::Burst;

use crate::station::{Outcome, Scheduled, StationContext, StationEvent, StationTask};
use crate::{StationError, StationResult, WaitingAreaAllocator, recovery};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineConfig {
    pub line: LineId,
    /// Roadmap nodes inside the train's doors.  Boarding agents path to the
    /// nearest one; alighting agents appear around each.
    pub doors: Vec<NodeId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub timing: LineTiming,
}

/// Tunables of one line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineTiming {
    /// Seconds between arrivals.
    pub arrival_interval_secs: f32,
    /// Seconds a train stands at the platform.
    pub dwell_secs: f32,
    pub capacity: u32,
    /// Stop pulling agents into boarding once `capacity` is reached.
    pub limit_capacity: bool,
    /// Hold the train back until this many agents are on the floor.
    pub min_active_agents: usize,
    /// Wait for every door to finish alighting before boarding starts.
    pub alight_before_boarding: bool,
    /// Passengers leaving each train, split evenly over the doors.
    pub passengers: u32,
    /// Seconds between two alighting passengers at one door.
    pub burst_interval_secs: f32,
    /// Alighting passengers appear within this many metres of the door.
    pub alight_jitter: f32,
    /// Delay range before a selected agent starts walking to its door.
    pub pre_board_delay_secs: [f32; 2],
    /// Delay range before a preparing agent is taken on board.
    pub board_delay_secs: [f32; 2],
}

impl Default for LineTiming {
    fn default() -> Self {
        Self {
            arrival_interval_secs:  10.0,
            dwell_secs:             5.0,
            capacity:               500,
            limit_capacity:         false,
            min_active_agents:      0,
            alight_before_boarding: true,
            passengers:             20,
            burst_interval_secs:    0.5,
            alight_jitter:          1.5,
            pre_board_delay_secs:   [0.0, 1.0],
            board_delay_secs:       [1.0, 3.0],
        }
    }
}

impl LineConfig {
    pub fn new(line: LineId, doors: Vec<NodeId>) -> Self {
        Self { line, doors, timing: LineTiming::default() }
    }

    pub fn with_timing(mut self, timing: LineTiming) -> Self {
        self.timing = timing;
        self
    }
}

// ── Runtime ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinePhase {
    Idle,
    Arrived,
    PreparingToBoard,
    Boarding,
}

#[derive(Clone, Debug)]
pub struct Door {
    pub node: NodeId,
    pub position: Vec2,
    /// Exit goal nearest the door; alighting passengers head here.
    pub exit: Option<NodeId>,
    pub burst: Burst,
}

#[derive(Debug)]
pub struct LineController {
    pub line: LineId,
    pub timing: LineTiming,
    doors: Vec<Door>,
    phase: LinePhase,
    dwelling: bool,
    /// Bumped on every arrival; burst tasks of an earlier train are ignored.
    cycle: u32,
    arrival_timer: f32,
    dwell_timer: f32,
    boarded_count: u32,
}

impl LineController {
    pub fn new(config: LineConfig, roadmap: &Roadmap) -> StationResult<Self> {
        if config.doors.is_empty() {
            return Err(StationError::NoDoors(config.line));
        }
        let mut doors = Vec::with_capacity(config.doors.len());
        for node in config.doors {
            let position = roadmap.position(node).map_err(|_| StationError::UnknownNode(node))?;
            doors.push(Door { node, position, exit: roadmap.closest_goal(position), burst: Burst::finished() });
        }
        Ok(Self {
            line: config.line,
            timing: config.timing,
            doors,
            phase: LinePhase::Idle,
            dwelling: false,
            cycle: 0,
            arrival_timer: 0.0,
            dwell_timer: 0.0,
            boarded_count: 0,
        })
    }

    pub fn phase(&self) -> LinePhase {
        self.phase
    }

    pub fn is_dwelling(&self) -> bool {
        self.dwelling
    }

    /// Number of trains that have arrived so far.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Agents pulled into boarding since the last arrival.
    pub fn boarded_count(&self) -> u32 {
        self.boarded_count
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Door whose centre is closest to `p`.
    pub fn nearest_door(&self, p: Vec2) -> Option<&Door> {
        self.doors
            .iter()
            .min_by(|a, b| a.position.distance2(p).total_cmp(&b.position.distance2(p)))
    }

    fn at_capacity(&self) -> bool {
        self.timing.limit_capacity && self.boarded_count >= self.timing.capacity
    }

    fn alighting_done(&self) -> bool {
        !self.timing.alight_before_boarding || self.doors.iter().all(|d| d.burst.is_complete())
    }

    // ── Step ──────────────────────────────────────────────────────────────

    /// Advance the timers by `dt` and perform any transition that is due.
    pub fn update<S: LineOfSight + ?Sized>(
        &mut self,
        dt: f32,
        ctx: &mut StationContext<'_, S>,
        allocator: &mut WaitingAreaAllocator,
        out: &mut Outcome,
    ) {
        self.arrival_timer += dt;
        if self.phase == LinePhase::Idle
            && self.arrival_timer >= self.timing.arrival_interval_secs
            && ctx.agents.active_count() >= self.timing.min_active_agents
        {
            self.arrive(ctx, out);
            self.prepare_boarding(ctx, allocator, out);
        }

        if self.phase == LinePhase::PreparingToBoard && self.alighting_done() {
            self.begin_boarding(ctx, out);
        }

        if self.dwelling {
            self.dwell_timer += dt;
            if self.dwell_timer >= self.timing.dwell_secs {
                self.depart(ctx, allocator, out);
            }
        }
    }

    fn arrive<S: LineOfSight + ?Sized>(&mut self, ctx: &mut StationContext<'_, S>, out: &mut Outcome) {
        self.arrival_timer = 0.0;
        self.dwell_timer = 0.0;
        self.dwelling = true;
        self.cycle = self.cycle.wrapping_add(1);
        self.boarded_count = 0;
        self.phase = LinePhase::Arrived;

        let per_door = self.timing.passengers / self.doors.len() as u32;
        for (i, door) in self.doors.iter_mut().enumerate() {
            door.burst = Burst::new(per_door, self.timing.burst_interval_secs).unwrap_or_else(|e| {
                log::warn!("{}: door {}: {e}; no passengers alight", self.line, door.node);
                Burst::finished()
            });
            if !door.burst.is_complete() {
                out.scheduled.push(Scheduled {
                    at: ctx.now,
                    task: StationTask::AlightBurst { line: self.line, door: i, cycle: self.cycle },
                });
            }
        }
        log::info!("{} arrived at {} ({} passengers)", self.line, ctx.now, per_door * self.doors.len() as u32);
        out.events.push(StationEvent::TrainArrived { line: self.line });
    }

    /// Pull waiting agents, then walking ones, of this line toward the doors.
    fn prepare_boarding<S: LineOfSight + ?Sized>(
        &mut self,
        ctx: &mut StationContext<'_, S>,
        allocator: &mut WaitingAreaAllocator,
        out: &mut Outcome,
    ) {
        let line = self.line;
        let mut candidates: Vec<(AgentId, bool)> = ctx
            .agents
            .iter()
            .filter(|(_, a)| a.line == Some(line) && is_eligible(&a.state))
            .map(|(id, a)| (id, a.state.is_waiting()))
            .collect();
        candidates.sort_by_key(|&(_, waiting)| !waiting);

        let mut skipped = 0usize;
        for (id, _) in candidates {
            if self.at_capacity() {
                log::debug!("{line}: capacity {} reached", self.timing.capacity);
                break;
            }
            let Some(agent) = ctx.agents.get_mut(id) else { continue };
            let Some(door) = self.nearest_door(agent.position).map(|d| d.node) else { break };
            if route_to_door(agent, door, ctx.roadmap, ctx.sight).is_none() {
                skipped += 1;
                continue;
            }
            if let Some(reservation) = agent.state.take_reservation() {
                if let Err(e) = allocator.release(reservation) {
                    log::warn!("{line}: {id:?}: {e}");
                }
            }
            agent.reset_motion();
            agent.state = AgentState::PreparingToBoard { line, moving: false };
            self.boarded_count += 1;

            let [lo, hi] = self.timing.pre_board_delay_secs;
            out.scheduled.push(Scheduled {
                at: ctx.now.after_secs(ctx.rng.uniform(lo, hi)),
                task: StationTask::BeginApproach { agent: id },
            });
        }
        if skipped > 0 {
            log::debug!("{line}: {skipped} agents have no reachable door this cycle");
        }
        self.phase = LinePhase::PreparingToBoard;
    }

    fn begin_boarding<S: LineOfSight + ?Sized>(&mut self, ctx: &mut StationContext<'_, S>, out: &mut Outcome) {
        let line = self.line;
        let [lo, hi] = self.timing.board_delay_secs;
        let preparing: Vec<AgentId> = ctx
            .agents
            .iter()
            .filter(|(_, a)| matches!(a.state, AgentState::PreparingToBoard { line: l, .. } if l == line))
            .map(|(id, _)| id)
            .collect();
        for agent in preparing {
            out.scheduled.push(Scheduled {
                at: ctx.now.after_secs(ctx.rng.uniform(lo, hi)),
                task: StationTask::Board { agent, line },
            });
        }
        self.phase = LinePhase::Boarding;
    }

    fn depart<S: LineOfSight + ?Sized>(
        &mut self,
        ctx: &mut StationContext<'_, S>,
        allocator: &mut WaitingAreaAllocator,
        out: &mut Outcome,
    ) {
        self.dwelling = false;
        self.dwell_timer = 0.0;
        self.phase = LinePhase::Idle;
        self.boarded_count = 0;
        for door in &mut self.doors {
            door.burst = Burst::finished();
        }

        let report = recovery::sweep(self.line, ctx.agents, allocator);
        log::info!(
            "{} departed at {} with {} passengers, {} left behind",
            self.line,
            ctx.now,
            report.departed.len(),
            report.stranded.len()
        );
        out.events.push(StationEvent::TrainDeparted {
            line: self.line,
            departed: report.departed.len(),
            stranded: report.stranded.len(),
        });
    }

    // ── Continuations ─────────────────────────────────────────────────────

    /// Let the next passenger off at door `index`, if the train of `cycle`
    /// is still at the platform.
    pub(crate) fn alight_one<S: LineOfSight + ?Sized>(
        &mut self,
        index: usize,
        cycle: u32,
        ctx: &mut StationContext<'_, S>,
        out: &mut Outcome,
    ) {
        let line = self.line;
        let jitter = self.timing.alight_jitter;
        let Some(door) = self.doors.get_mut(index) else { return };
        if !self.dwelling || cycle != self.cycle || door.burst.is_complete() {
            return;
        }
        if let Some(delay) = door.burst.emit() {
            out.scheduled.push(Scheduled {
                at: ctx.now.after_secs(delay),
                task: StationTask::AlightBurst { line, door: index, cycle },
            });
        }

        let Some(exit) = door.exit else {
            log::warn!("{line}: no exit goal for door {}", door.node);
            return;
        };
        let (min_speed, max_speed) = ctx.speed_range;
        let position = door.position + ctx.rng.jitter(jitter);
        let mut agent = Agent::new(position, ctx.rng.uniform(min_speed, max_speed))
            .with_line(Some(line))
            .with_state(AgentState::Alighting);
        if let Err(e) = agent.set_path(ctx.roadmap, door.node, exit) {
            log::warn!("{line}: alighting passenger at {} cannot leave: {e}", door.node);
            return;
        }
        let id = ctx.agents.insert(agent);
        out.events.push(StationEvent::Alighted { agent: id, line });
    }
}

/// Agents of a line that boarding may pick up.
fn is_eligible(state: &AgentState) -> bool {
    matches!(
        state,
        AgentState::Walking
            | AgentState::ToWaitingArea(_)
            | AgentState::ApproachingSpot(_)
            | AgentState::Waiting(_)
    )
}

/// Point `agent` at `door` from the nearest visible roadmap node.
fn route_to_door<S: LineOfSight + ?Sized>(
    agent: &mut Agent,
    door: NodeId,
    roadmap: &Roadmap,
    sight: &S,
) -> Option<()> {
    let start = roadmap.nearest_visible_node(agent.position, sight)?;
    agent.set_path(roadmap, start, door).ok()
}
