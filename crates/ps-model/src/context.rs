//! Read-only simulation state passed to every velocity computation.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use ps_agent::{Agent, AgentRegistry};
use ps_core::{AgentId, Point, Step};
use ps_geometry::Geometry;
use ps_routing::RouteRegistry;

type AgentEntry = GeomWithData<[f64; 2], AgentId>;

/// Spatial index over agent positions, rebuilt once per step.
pub struct NeighbourIndex {
    tree:       RTree<AgentEntry>,
    max_radius: f64,
}

impl NeighbourIndex {
    /// Bulk-load the current positions of every agent in `agents`.
    pub fn build(agents: &AgentRegistry) -> Self {
        let entries = agents
            .iter()
            .map(|a| GeomWithData::new([a.position.x, a.position.y], a.id))
            .collect();
        Self {
            tree:       RTree::bulk_load(entries),
            max_radius: agents.max_radius(),
        }
    }

    /// Ids of agents whose centre lies within `radius` of `p`.
    pub fn within(&self, p: Point, radius: f64) -> impl Iterator<Item = AgentId> + '_ {
        self.tree
            .locate_within_distance([p.x, p.y], radius * radius)
            .map(|e| e.data)
    }

    /// Largest body radius among indexed agents.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// A read-only snapshot of the simulation passed to every
/// [`OperationalModel`][crate::OperationalModel] call.
///
/// Built once per step by ps-sim and shared immutably across all agents
/// during the velocity phase.
pub struct StepContext<'a> {
    /// The step being computed.
    pub step: Step,

    /// Seconds per step.
    pub dt: f64,

    pub geometry:   &'a Geometry,
    pub routes:     &'a RouteRegistry,
    pub agents:     &'a AgentRegistry,
    pub neighbours: &'a NeighbourIndex,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(
        step:       Step,
        dt:         f64,
        geometry:   &'a Geometry,
        routes:     &'a RouteRegistry,
        agents:     &'a AgentRegistry,
        neighbours: &'a NeighbourIndex,
    ) -> Self {
        Self { step, dt, geometry, routes, agents, neighbours }
    }

    /// Live agents other than `id` whose centre lies within `radius` of
    /// `position`.
    pub fn neighbours_of(
        &self,
        id:       AgentId,
        position: Point,
        radius:   f64,
    ) -> impl Iterator<Item = &'a Agent> + 'a {
        let agents = self.agents;
        self.neighbours
            .within(position, radius)
            .filter(move |&other| other != id)
            .filter_map(move |other| agents.get(other))
    }
}
