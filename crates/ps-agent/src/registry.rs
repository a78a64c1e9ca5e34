//! `AgentRegistry` — id-ordered storage for live agents.
//!
//! # Why a `BTreeMap`?
//!
//! Agents come and go mid-run (removal at exits, explicit removal), so a
//! dense `Vec` indexed by id would either leak slots or reuse ids.  A
//! `BTreeMap<AgentId, Agent>` keeps ids stable, removal O(log n), and gives
//! ascending-id iteration for free, which the simulation relies on for
//! deterministic updates.

use std::collections::BTreeMap;

use ps_core::AgentId;

use crate::{Agent, AgentSnapshot, AgentSpec, Agents};

#[derive(Clone, Debug)]
pub struct AgentRegistry {
    agents:  BTreeMap<AgentId, Agent>,
    next_id: u64,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self { agents: BTreeMap::new(), next_id: 1 }
    }

    /// Store a new agent at journey position `stage_index` and return its id.
    ///
    /// The caller has already validated `spec` against the journey and
    /// geometry.
    pub fn insert(&mut self, spec: &AgentSpec, stage_index: usize) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.insert(
            id,
            Agent {
                id,
                position:    spec.position,
                journey_id:  spec.journey_id,
                stage_id:    spec.stage_id,
                stage_index,
                parameters:  spec.parameters,
            },
        );
        id
    }

    /// Remove and return an agent, or `None` if `id` is not live.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in ascending id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Mutable agents in ascending id order.
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Agent> + '_ {
        self.agents.values_mut()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    /// Largest radius among live agents (0 when empty).
    pub fn max_radius(&self) -> f64 {
        self.agents.values().map(Agent::radius).fold(0.0, f64::max)
    }

    /// The id the next inserted agent will receive.
    pub fn next_id(&self) -> AgentId {
        AgentId(self.next_id)
    }

    /// Owned snapshot of every live agent, detached from the registry.
    pub fn snapshot(&self) -> Agents {
        self.agents.values().map(AgentSnapshot::from).collect()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
