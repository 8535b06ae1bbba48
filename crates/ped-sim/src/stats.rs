//! Running totals of a simulation.

use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Agents created by continuous spawners and train doors.
    pub spawned: usize,
    /// Of `spawned`, how many stepped off a train.
    pub alighted: usize,
    /// Spawner firings dropped because the agent cap was reached.
    pub skipped_spawns: usize,
    /// Agents that reached their exit goal.
    pub exited: usize,
    pub boarded: usize,
    /// Boarded agents that left with their train.
    pub departed: usize,
    /// Agents still heading for a door when their train left.
    pub stranded: usize,
    pub out_of_bounds: usize,
    pub arrivals: usize,
    pub departures: usize,
}

impl SimStats {
    /// Agents removed from the simulation for any reason.
    pub fn removed(&self) -> usize {
        self.exited + self.departed + self.stranded + self.out_of_bounds
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spawned {} ({} alighted), exited {}, boarded {}, departed {}, stranded {}, out of bounds {}, trains {}/{}",
            self.spawned,
            self.alighted,
            self.exited,
            self.boarded,
            self.departed,
            self.stranded,
            self.out_of_bounds,
            self.arrivals,
            self.departures
        )
    }
}
