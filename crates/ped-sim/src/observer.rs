//! Simulation observer trait for progress reporting and data collection.

use ped_agent::AgentStore;
use ped_core::{LineId, SimClock};
use ped_station::Station;

use crate::SimStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: departure log
///
/// ```rust,ignore
/// struct Departures(Vec<(LineId, usize)>);
///
/// impl SimObserver for Departures {
///     fn on_train_departure(&mut self, line: LineId, departed: usize, _: usize, _: &SimClock) {
///         self.0.push((line, departed));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, after the clock has advanced.
    fn on_step_start(&mut self, _clock: &SimClock) {}

    /// Called at the end of each step with the running totals.
    fn on_step_end(&mut self, _clock: &SimClock, _stats: &SimStats) {}

    /// A train of `line` has arrived and its doors are opening.
    fn on_train_arrival(&mut self, _line: LineId, _clock: &SimClock) {}

    /// A train of `line` has left with `departed` passengers on board;
    /// `stranded` agents were still on their way to a door.
    fn on_train_departure(&mut self, _line: LineId, _departed: usize, _stranded: usize, _clock: &SimClock) {}

    /// Called at snapshot intervals (every `config.output_interval_steps`
    /// steps) with read access to every agent and the station.
    fn on_snapshot(&mut self, _clock: &SimClock, _agents: &AgentStore, _station: &Station) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _clock: &SimClock, _stats: &SimStats) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
