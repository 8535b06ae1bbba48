//! The `Sim` struct and its step loop.

use ped_agent::{Agent, AgentState, AgentStore, MotionConfig, MotionContext, motion};
use ped_core::{AgentId, SimClock, SimConfig, SimRng, SpawnerId, SpotReservation};
use ped_field::CrowdField;
use ped_roadmap::{LineOfSight, Roadmap};
use ped_schedule::{SpawnRequest, SpawnScheduler, TimerQueue};
use ped_station::{Outcome, Station, StationContext, StationEvent, StationTask};

use crate::{SimObserver, SimStats};

/// Agents placed on a waiting spot land within this distance of it.
const SPOT_JITTER: f32 = 0.3;

/// A delayed piece of work held in the timer queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Spawner fires and reschedules itself.
    Spawn(SpawnerId),
    /// Train operation follow-up.
    Station(StationTask),
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<F, S>` holds all simulation state and drives the per-step sequence:
///
/// 1. **Continuations**: drain every timer entry due at the new clock time
///    (spawner firings, alighting bursts, boarding steps).
/// 2. **Trains**: advance every line controller.
/// 3. **Field**: fold last step's agent contributions into the field and
///    solve it.
/// 4. **Agents**: in a snapshot of ids, remove agents out of bounds, move
///    walkers through the field, let standing agents register as
///    obstacles, then resolve agents that reached their target.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<F: CrowdField, S: LineOfSight> {
    pub config: SimConfig,
    pub motion: MotionConfig,
    pub clock: SimClock,
    pub rng: SimRng,

    pub agents: AgentStore,
    pub roadmap: Roadmap,
    pub field: F,
    pub sight: S,
    pub station: Station,
    pub spawners: SpawnScheduler,
    pub timers: TimerQueue<Continuation>,

    pub stats: SimStats,
}

impl<F: CrowdField, S: LineOfSight> Sim<F, S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current step to `config.total_steps`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.clock.step < self.config.total_steps {
            self.step(observer);
        }
        log::info!("finished at {}: {}", self.clock, self.stats);
        observer.on_sim_end(&self.clock, &self.stats);
    }

    /// Run exactly `n` steps from the current position (ignores
    /// `total_steps`).
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Advance the simulation by one time step.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let dt = self.config.time_step_secs;
        self.clock.advance(dt);
        observer.on_step_start(&self.clock);

        for continuation in self.timers.drain_due(self.clock.now) {
            self.resume(continuation, observer);
        }

        let outcome = {
            let mut ctx = station_context(
                &self.config,
                &self.clock,
                &mut self.agents,
                &self.roadmap,
                &self.sight,
                &mut self.rng,
            );
            self.station.update(dt, &mut ctx)
        };
        self.absorb(outcome, observer);

        self.field.update_density();
        self.field.update_velocity_fields();
        self.field.solve(dt);

        self.move_agents();

        observer.on_step_end(&self.clock, &self.stats);
        let every = self.config.output_interval_steps;
        if every > 0 && self.clock.step % every == 0 {
            observer.on_snapshot(&self.clock, &self.agents, &self.station);
        }
    }

    /// Agents still taking part in the crowd.
    pub fn active_agents(&self) -> usize {
        self.agents.active_count()
    }

    // ── Continuations ─────────────────────────────────────────────────────

    fn resume<O: SimObserver>(&mut self, continuation: Continuation, observer: &mut O) {
        match continuation {
            Continuation::Spawn(id) => {
                if let Some(request) = self.spawners.request(id, &mut self.rng) {
                    if self.agents.active_count() < self.config.max_agents {
                        self.spawn(request);
                    } else {
                        self.stats.skipped_spawns += 1;
                    }
                }
                let gap = self.spawners.next_gap(id, &mut self.rng);
                if gap.is_finite() {
                    self.timers.push(self.clock.now.after_secs(gap), Continuation::Spawn(id));
                }
            }
            Continuation::Station(task) => {
                let outcome = {
                    let mut ctx = station_context(
                        &self.config,
                        &self.clock,
                        &mut self.agents,
                        &self.roadmap,
                        &self.sight,
                        &mut self.rng,
                    );
                    self.station.run_task(task, &mut ctx)
                };
                self.absorb(outcome, observer);
            }
        }
    }

    /// Queue the station's follow-ups and account for its events.
    fn absorb<O: SimObserver>(&mut self, outcome: Outcome, observer: &mut O) {
        for s in outcome.scheduled {
            self.timers.push(s.at, Continuation::Station(s.task));
        }
        for event in outcome.events {
            match event {
                StationEvent::TrainArrived { line } => {
                    self.stats.arrivals += 1;
                    observer.on_train_arrival(line, &self.clock);
                }
                StationEvent::TrainDeparted { line, departed, stranded } => {
                    self.stats.departures += 1;
                    self.stats.departed += departed;
                    self.stats.stranded += stranded;
                    observer.on_train_departure(line, departed, stranded, &self.clock);
                }
                StationEvent::Alighted { .. } => {
                    self.stats.spawned += 1;
                    self.stats.alighted += 1;
                }
                StationEvent::Boarded { .. } => self.stats.boarded += 1,
            }
        }
    }

    /// Create the agent a spawner asked for.  Agents with a line try for a
    /// waiting spot first and fall back to walking to their goal.
    fn spawn(&mut self, request: SpawnRequest) -> Option<AgentId> {
        let origin = match self.roadmap.position(request.node) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("{}: {e}", request.spawner);
                return None;
            }
        };
        let Some(goal) = request.goal.or_else(|| self.roadmap.goals.first().copied()) else {
            log::warn!("{}: no goal to walk to", request.spawner);
            return None;
        };
        let speed = self.rng.uniform(self.config.min_speed, self.config.max_speed);
        let mut agent = Agent::new(origin + request.offset, speed).with_line(request.line);

        let mut reservation = None;
        if let Some(line) = request.line {
            match self.station.allocate(request.node, origin, line, request.force_line, &mut self.rng) {
                Some((area_node, res)) => match agent.set_path(&self.roadmap, request.node, area_node) {
                    Ok(()) => reservation = Some(res),
                    Err(e) => {
                        log::warn!("{}: waiting area unreachable: {e}", request.spawner);
                        self.release(res);
                    }
                },
                None => log::debug!("{}: no free waiting spot for {line}", request.spawner),
            }
        }
        match reservation {
            Some(res) => agent.state = AgentState::ToWaitingArea(res),
            None => {
                if let Err(e) = agent.set_path(&self.roadmap, request.node, goal) {
                    log::warn!("{}: {e}", request.spawner);
                    return None;
                }
            }
        }

        self.stats.spawned += 1;
        Some(self.agents.insert(agent))
    }

    fn release(&mut self, reservation: SpotReservation) {
        if let Err(e) = self.station.release(reservation) {
            log::warn!("{e}");
        }
    }

    // ── Agents ────────────────────────────────────────────────────────────

    fn move_agents(&mut self) {
        let dt = self.config.time_step_secs;
        let mut outside = Vec::new();
        let mut reached = Vec::new();
        {
            let ctx = MotionContext {
                roadmap: &self.roadmap,
                sight: &self.sight,
                config: &self.motion,
                edges: self.station.edges(),
                dt,
            };
            for id in self.agents.ids() {
                let Some(agent) = self.agents.get_mut(id) else { continue };
                if self.config.out_of_bounds(agent.position.x, agent.position.y) {
                    outside.push(id);
                } else if agent.state.is_moving() {
                    motion::step(agent, &ctx, &mut self.field);
                    if agent.done {
                        reached.push(id);
                    }
                } else if agent.state.is_obstacle() {
                    motion::passive_step(agent, &ctx, &mut self.field);
                }
            }
        }

        for id in outside {
            let Some(mut agent) = self.agents.remove(id) else { continue };
            log::debug!("{id:?} left the floor at ({:.1}, {:.1})", agent.position.x, agent.position.y);
            if let Some(res) = agent.state.take_reservation() {
                self.release(res);
            }
            self.stats.out_of_bounds += 1;
        }
        for id in reached {
            self.target_reached(id);
        }
    }

    /// Advance an agent whose current navigation target was reached.
    fn target_reached(&mut self, id: AgentId) {
        let Some(agent) = self.agents.get_mut(id) else { return };
        match agent.state {
            AgentState::Walking | AgentState::Alighting => {
                self.agents.remove(id);
                self.stats.exited += 1;
            }
            AgentState::ToWaitingArea(_) => {
                let Some(spot) = agent.state.reservation().and_then(|r| self.station.spot_position(r)) else {
                    return;
                };
                agent.state = match std::mem::replace(&mut agent.state, AgentState::Walking) {
                    AgentState::ToWaitingArea(r) => AgentState::ApproachingSpot(r),
                    other => other,
                };
                agent.set_point_goal(spot);
            }
            AgentState::ApproachingSpot(_) => {
                let Some(spot) = agent.state.reservation().and_then(|r| self.station.spot_position(r)) else {
                    return;
                };
                agent.teleport(spot + self.rng.jitter(SPOT_JITTER));
                agent.reset_motion();
                if let Some(door) = agent.line.and_then(|l| self.station.nearest_door(l, agent.position)) {
                    agent.face(door);
                }
                agent.state = match std::mem::replace(&mut agent.state, AgentState::Walking) {
                    AgentState::ApproachingSpot(r) => AgentState::Waiting(r),
                    other => other,
                };
            }
            AgentState::PreparingToBoard { line, moving: true } => {
                if ped_station::board(id, line, &mut self.agents).is_some() {
                    self.stats.boarded += 1;
                }
            }
            _ => {}
        }
    }
}

/// Borrow the pieces of a [`Sim`] that station operations touch, leaving the
/// station itself free to be borrowed mutably alongside.
fn station_context<'a, S: LineOfSight>(
    config: &SimConfig,
    clock: &SimClock,
    agents: &'a mut AgentStore,
    roadmap: &'a Roadmap,
    sight: &'a S,
    rng: &'a mut SimRng,
) -> StationContext<'a, S> {
    StationContext {
        now: clock.now,
        agents,
        roadmap,
        sight,
        rng,
        speed_range: (config.min_speed, config.max_speed),
    }
}
