//! `Scenario` — serde description of one evacuation setup.
//!
//! ```toml
//! dt = 0.01
//! output_interval = 10
//! boundary = [[0.0, 0.0], [20.0, 0.0], [20.0, 4.0], [0.0, 4.0]]
//! exits = [[[19.0, 0.0], [20.0, 0.0], [20.0, 4.0], [19.0, 4.0]]]
//! agents = [[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]
//!
//! [model]
//! strength_neighbor_repulsion = 8.0
//!
//! [agent]
//! v0 = 1.4
//! ```
//!
//! Only `boundary` and `exits` are required.

use std::path::Path;
use std::sync::Arc;

use ps_agent::{AgentParameters, AgentSpec};
use ps_core::{JourneyId, Point, StageId};
use ps_geometry::{GeometryBuilder, Polygon};
use ps_model::{CollisionFreeSpeedModel, CollisionFreeSpeedModelBuilder};
use ps_routing::JourneyDescription;
use ps_sim::{Simulation, SimulationBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ScenarioError, ScenarioResult};

// ── Parameter sections ────────────────────────────────────────────────────────

/// The four collision-free speed model parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub strength_neighbor_repulsion: f64,
    pub range_neighbor_repulsion:    f64,
    pub strength_geometry_repulsion: f64,
    pub range_geometry_repulsion:    f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            strength_neighbor_repulsion: CollisionFreeSpeedModelBuilder::DEFAULT_STRENGTH_NEIGHBOR,
            range_neighbor_repulsion:    CollisionFreeSpeedModelBuilder::DEFAULT_RANGE_NEIGHBOR,
            strength_geometry_repulsion: CollisionFreeSpeedModelBuilder::DEFAULT_STRENGTH_GEOMETRY,
            range_geometry_repulsion:    CollisionFreeSpeedModelBuilder::DEFAULT_RANGE_GEOMETRY,
        }
    }
}

impl ModelParams {
    fn builder(&self) -> CollisionFreeSpeedModelBuilder {
        CollisionFreeSpeedModelBuilder::new(
            self.strength_neighbor_repulsion,
            self.range_neighbor_repulsion,
            self.strength_geometry_repulsion,
            self.range_geometry_repulsion,
        )
    }
}

/// Parameters shared by every agent of the scenario.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    pub v0:       f64,
    pub radius:   f64,
    pub time_gap: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            v0:       AgentParameters::DEFAULT_V0,
            radius:   AgentParameters::DEFAULT_RADIUS,
            time_gap: AgentParameters::DEFAULT_TIME_GAP,
        }
    }
}

impl From<AgentParams> for AgentParameters {
    fn from(p: AgentParams) -> Self {
        AgentParameters::new(p.v0, p.radius, p.time_gap)
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Outer walkable polygon.
    pub boundary: Vec<[f64; 2]>,
    /// Exit polygons; agents leave the simulation inside any of them.
    pub exits: Vec<Vec<[f64; 2]>>,
    /// Agent start positions.
    #[serde(default)]
    pub agents: Vec<[f64; 2]>,
    #[serde(default)]
    pub model: ModelParams,
    #[serde(default)]
    pub agent: AgentParams,
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Snapshot every n-th step; 0 disables snapshots.
    #[serde(default = "default_output_interval")]
    pub output_interval: u64,
}

fn default_dt() -> f64 {
    SimulationBuilder::<CollisionFreeSpeedModel>::DEFAULT_DT
}

fn default_output_interval() -> u64 {
    1
}

impl Scenario {
    /// Load a scenario, choosing the parser from the file extension
    /// (`.toml` or `.json`, case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let text = match ext.as_deref() {
            Some("toml") | Some("json") => std::fs::read_to_string(path)?,
            _ => return Err(ScenarioError::UnsupportedFormat(path.to_path_buf())),
        };
        let scenario = if ext.as_deref() == Some("toml") {
            Self::from_toml_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        info!(path = %path.display(), agents = scenario.agents.len(), exits = scenario.exits.len(), "scenario loaded");
        Ok(scenario)
    }

    pub fn from_toml_str(text: &str) -> ScenarioResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> ScenarioResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build a simulation holding every exit and agent of the scenario.
    ///
    /// Each exit gets its own single-stage journey; an agent joins the
    /// journey whose exit centroid is closest to its start position (the
    /// lowest exit index wins ties).
    pub fn build_simulation(&self) -> ScenarioResult<Simulation> {
        if self.exits.is_empty() {
            return Err(ScenarioError::NoExits);
        }

        let mut gb = GeometryBuilder::new();
        gb.add_accessible_area(Polygon::from_coords(&self.boundary));
        let geometry = Arc::new(gb.build()?);
        let model = Arc::new(self.model.builder().build()?);

        let mut sim = SimulationBuilder::new(geometry, model)
            .dt(self.dt)
            .output_interval(self.output_interval)
            .build()?;

        let mut routes: Vec<(Point, JourneyId, StageId)> = Vec::with_capacity(self.exits.len());
        for coords in &self.exits {
            let polygon = Polygon::from_coords(coords);
            let centre = polygon.centroid();
            let stage = sim.add_exit_stage(polygon)?;
            let journey = sim.add_journey(&JourneyDescription::new().with_stage(stage))?;
            routes.push((centre, journey, stage));
        }

        let parameters = AgentParameters::from(self.agent);
        for &[x, y] in &self.agents {
            let position = Point::new(x, y);
            let (journey, stage) = nearest_route(&routes, position);
            let id = sim.add_agent(
                AgentSpec::new(position, journey, stage).with_parameters(parameters),
            )?;
            debug!(agent = %id, %position, %stage, "agent placed");
        }

        info!(
            agents = sim.agent_count(),
            exits  = routes.len(),
            dt     = sim.dt(),
            "scenario simulation built"
        );
        Ok(sim)
    }
}

fn nearest_route(routes: &[(Point, JourneyId, StageId)], position: Point) -> (JourneyId, StageId) {
    let mut best = (f64::INFINITY, JourneyId::INVALID, StageId::INVALID);
    for &(centre, journey, stage) in routes {
        let d = centre.distance(position);
        if d < best.0 {
            best = (d, journey, stage);
        }
    }
    (best.1, best.2)
}
