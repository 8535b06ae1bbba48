//! Agent storage.
//!
//! Agents are spawned and destroyed throughout a run, so they live in a
//! `SlotMap`: removal is O(1), and an `AgentId` held by a pending timer
//! entry stops resolving once its agent is gone instead of aliasing a newer
//! one.

use slotmap::SlotMap;

use ped_core::AgentId;

use crate::Agent;

#[derive(Default)]
pub struct AgentStore {
    agents: SlotMap<AgentId, Agent>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, agent: Agent) -> AgentId {
        self.agents.insert(agent)
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Snapshot of all live ids, in slot order.  Iterate over this when the
    /// loop body may insert or remove agents.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> + '_ {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut Agent)> + '_ {
        self.agents.iter_mut()
    }

    /// Number of agents matching `pred`.
    pub fn count_where(&self, pred: impl Fn(&Agent) -> bool) -> usize {
        self.agents.values().filter(|a| pred(a)).count()
    }

    /// Agents that still take part in the crowd (everything but `Boarded`).
    pub fn active_count(&self) -> usize {
        self.count_where(|a| !a.state.is_boarded())
    }
}
