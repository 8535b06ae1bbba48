//! End-of-dwell sweep.
//!
//! When a train leaves, agents still caught in one of its transitions are
//! resolved so nothing is left half way:
//!
//! | State on departure            | Outcome                                 |
//! |-------------------------------|-----------------------------------------|
//! | `Boarded { line }`            | removed, left with the train            |
//! | `PreparingToBoard { line }`   | removed, stranded                       |
//! | `Alighting` from `line`       | brought to rest, continues as `Walking` |

use ped_agent::{AgentState, AgentStore};
use ped_core::{AgentId, LineId};

use crate::WaitingAreaAllocator;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub departed: Vec<AgentId>,
    pub stranded: Vec<AgentId>,
    pub released: Vec<AgentId>,
}

pub fn sweep(line: LineId, agents: &mut AgentStore, allocator: &mut WaitingAreaAllocator) -> RecoveryReport {
    let mut report = RecoveryReport::default();
    for id in agents.ids() {
        let Some(agent) = agents.get_mut(id) else { continue };
        match agent.state {
            AgentState::Boarded { line: l } if l == line => report.departed.push(id),
            AgentState::PreparingToBoard { line: l, .. } if l == line => report.stranded.push(id),
            AgentState::Alighting if agent.line == Some(line) => {
                agent.reset_motion();
                agent.state = AgentState::Walking;
                agent.line = None;
                report.released.push(id);
            }
            _ => {}
        }
    }

    for &id in report.departed.iter().chain(&report.stranded) {
        let Some(mut agent) = agents.remove(id) else { continue };
        if let Some(reservation) = agent.state.take_reservation() {
            if let Err(e) = allocator.release(reservation) {
                log::warn!("{line}: releasing spot of removed agent {id:?}: {e}");
            }
        }
    }

    if !report.stranded.is_empty() {
        log::info!("{line}: {} agents stranded on the platform", report.stranded.len());
    }
    log::debug!(
        "{line}: departed {}, stranded {}, released {}",
        report.departed.len(),
        report.stranded.len(),
        report.released.len()
    );
    report
}
