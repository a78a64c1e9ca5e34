//! The `Simulation` struct and its step loop.

use std::sync::Arc;

use ps_agent::{Agent, AgentRegistry, AgentSpec, Agents};
use ps_core::{AgentId, JourneyId, Point, SimClock, StageId, Step};
use ps_geometry::{Geometry, Polygon};
use ps_model::{CollisionFreeSpeedModel, NeighbourIndex, OperationalModel, StepContext};
use ps_routing::{JourneyDescription, RouteRegistry, Stage};
use tracing::{debug, error, info};

use crate::{SimError, SimObserver, SimResult};

// ── State machine ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimState {
    /// Accepting agents, journeys and `iterate` calls.
    Ready,
    /// Inside `iterate`.  Only observable if a step is interrupted.
    Stepping,
    /// An invariant was violated; `iterate` always fails.
    Terminated,
}

/// Outcome of one successful [`Simulation::iterate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// The step that was computed (the counter before advancing).
    pub step: Step,
    /// Agents still in the simulation after the step.
    pub live_agents: usize,
    /// Agents removed at an exit during the step, ascending id order.
    pub removed: Vec<AgentId>,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Owns the agent, stage and journey registries and shares an immutable
/// [`Geometry`] and operational model with any other simulation built from
/// the same `Arc`s.  Create via [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation<M: OperationalModel = CollisionFreeSpeedModel> {
    geometry:        Arc<Geometry>,
    model:           Arc<M>,
    clock:           SimClock,
    routes:          RouteRegistry,
    agents:          AgentRegistry,
    state:           SimState,
    output_interval: u64,
    removed_last:    Vec<AgentId>,
}

impl<M: OperationalModel> Simulation<M> {
    pub(crate) fn from_parts(
        geometry:        Arc<Geometry>,
        model:           Arc<M>,
        clock:           SimClock,
        output_interval: u64,
    ) -> Self {
        Self {
            geometry,
            model,
            clock,
            routes: RouteRegistry::new(),
            agents: AgentRegistry::new(),
            state: SimState::Ready,
            output_interval,
            removed_last: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    pub fn routes(&self) -> &RouteRegistry {
        &self.routes
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn dt(&self) -> f64 {
        self.clock.dt()
    }

    /// Number of completed iterations.
    pub fn current_step(&self) -> Step {
        self.clock.current_step
    }

    /// Simulated seconds: `current_step · dt`.
    pub fn elapsed_time(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn output_interval(&self) -> u64 {
        self.output_interval
    }

    // ── Stages and journeys ───────────────────────────────────────────────

    /// Register an exit region.  Agents entering it are removed.
    pub fn add_exit_stage(&mut self, polygon: impl Into<Polygon>) -> SimResult<StageId> {
        let id = self.routes.add_exit_stage(polygon.into())?;
        debug!(stage = %id, "exit stage added");
        Ok(id)
    }

    /// Register a waypoint, reached within `distance` of `position`.
    pub fn add_waypoint_stage(&mut self, position: Point, distance: f64) -> SimResult<StageId> {
        let id = self.routes.add_waypoint_stage(position, distance)?;
        debug!(stage = %id, %position, distance, "waypoint stage added");
        Ok(id)
    }

    pub fn add_journey(&mut self, description: &JourneyDescription) -> SimResult<JourneyId> {
        let id = self.routes.add_journey(description)?;
        debug!(journey = %id, stages = description.stages().len(), "journey added");
        Ok(id)
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Validate `spec` and add a new agent.
    ///
    /// The agent starts at the first occurrence of `spec.stage_id` within
    /// its journey.
    pub fn add_agent(&mut self, spec: AgentSpec) -> SimResult<AgentId> {
        let journey = self
            .routes
            .journey(spec.journey_id)
            .ok_or(SimError::UnknownJourney(spec.journey_id))?;
        if self.routes.stage(spec.stage_id).is_none() {
            return Err(SimError::UnknownStage(spec.stage_id));
        }
        let stage_index = journey.position_of(spec.stage_id).ok_or(SimError::StageNotInJourney {
            stage:   spec.stage_id,
            journey: spec.journey_id,
        })?;
        spec.parameters.validate()?;
        if !self.geometry.contains(spec.position) {
            return Err(SimError::AgentOutsideGeometry { position: spec.position });
        }

        let id = self.agents.insert(&spec, stage_index);
        debug!(agent = %id, position = %spec.position, journey = %spec.journey_id, "agent added");
        Ok(id)
    }

    /// Delete an agent.  Removing an id that is not live fails.
    pub fn remove_agent(&mut self, id: AgentId) -> SimResult<()> {
        if self.agents.remove(id).is_none() {
            return Err(SimError::UnknownAgent(id));
        }
        debug!(agent = %id, "agent removed");
        Ok(())
    }

    /// Owned snapshot of all live agents in id order.  Unaffected by later
    /// `iterate` calls; clone it to walk it again.
    pub fn agents(&self) -> Agents {
        self.agents.snapshot()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Agents removed at an exit during the most recent successful step.
    pub fn removed_agents_last_step(&self) -> &[AgentId] {
        &self.removed_last
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance the simulation by one step of `dt` seconds.
    ///
    /// On an invariant violation the simulation moves to
    /// [`SimState::Terminated`] and every later call returns
    /// [`SimError::Terminated`].
    pub fn iterate(&mut self) -> SimResult<StepReport> {
        if self.state == SimState::Terminated {
            return Err(SimError::Terminated);
        }
        self.state = SimState::Stepping;
        match self.process_step() {
            Ok(report) => {
                self.state = SimState::Ready;
                Ok(report)
            }
            Err(e) => {
                self.state = SimState::Terminated;
                error!(step = %self.clock.current_step, error = %e, "simulation terminated");
                Err(e)
            }
        }
    }

    /// Run exactly `n` steps, calling observer hooks.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_step(observer)?;
        }
        observer.on_sim_end(self.clock.current_step);
        Ok(())
    }

    /// Step until no agents remain or `max_steps` steps have run.
    ///
    /// Returns the number of steps executed; check
    /// [`agent_count`](Self::agent_count) to tell the two outcomes apart.
    pub fn run_until_empty<O: SimObserver>(
        &mut self,
        max_steps: u64,
        observer:  &mut O,
    ) -> SimResult<u64> {
        let mut steps = 0;
        while steps < max_steps && !self.agents.is_empty() {
            self.observed_step(observer)?;
            steps += 1;
        }
        info!(
            steps,
            remaining = self.agents.len(),
            elapsed_secs = self.clock.elapsed_secs(),
            "run finished"
        );
        observer.on_sim_end(self.clock.current_step);
        Ok(steps)
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_step;
        observer.on_step_start(now);
        let report = self.iterate()?;
        for &id in &report.removed {
            observer.on_agent_removed(now, id);
        }
        observer.on_step_end(&report);

        let done = self.clock.current_step;
        if self.output_interval > 0 && done.0.is_multiple_of(self.output_interval) {
            observer.on_snapshot(done, self.clock.elapsed_secs(), &self.agents);
        }
        Ok(())
    }

    fn process_step(&mut self) -> SimResult<StepReport> {
        let now = self.clock.current_step;

        // ── Phase 1: resolve targets (also validates references) ─────────
        let targets = self.resolve_targets()?;

        // ── Phase 2: velocity phase (read-only) ───────────────────────────
        let velocities = self.compute_velocities(now, &targets);

        // ── Phase 3: apply phase (ascending AgentId) ──────────────────────
        let removed = self.apply_velocities(&velocities)?;
        for &id in &removed {
            self.agents.remove(id);
            debug!(agent = %id, step = %now, "agent reached exit");
        }

        self.clock.advance();
        self.removed_last.clone_from(&removed);
        Ok(StepReport { step: now, live_agents: self.agents.len(), removed })
    }

    /// Target point for every agent, in id order.
    fn resolve_targets(&self) -> SimResult<Vec<Point>> {
        self.agents
            .iter()
            .map(|agent| {
                self.current_stage(agent)
                    .map(|stage| stage.target_point(agent.position))
            })
            .collect()
    }

    /// The stage `agent` is heading for, checking its journey bookkeeping.
    fn current_stage(&self, agent: &Agent) -> SimResult<&Stage> {
        let journey = self.routes.journey(agent.journey_id).ok_or_else(|| {
            SimError::Invariant(format!(
                "agent {} references missing journey {}",
                agent.id, agent.journey_id
            ))
        })?;
        if journey.stage_at(agent.stage_index) != Some(agent.stage_id) {
            return Err(SimError::Invariant(format!(
                "agent {} stage index {} does not match stage {} in journey {}",
                agent.id, agent.stage_index, agent.stage_id, agent.journey_id
            )));
        }
        self.routes.stage(agent.stage_id).ok_or_else(|| {
            SimError::Invariant(format!(
                "agent {} references missing stage {}",
                agent.id, agent.stage_id
            ))
        })
    }

    /// Call the operational model for every agent.
    ///
    /// With the `parallel` Cargo feature this runs on Rayon's thread pool;
    /// results are collected in id order either way.
    fn compute_velocities(&self, now: Step, targets: &[Point]) -> Vec<Point> {
        let index = NeighbourIndex::build(&self.agents);
        let ctx = StepContext::new(
            now,
            self.clock.dt(),
            self.geometry.as_ref(),
            &self.routes,
            &self.agents,
            &index,
        );
        let model = self.model.as_ref();

        #[cfg(not(feature = "parallel"))]
        {
            self.agents
                .iter()
                .zip(targets)
                .map(|(agent, &target)| model.compute_velocity(agent, target, &ctx))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let agents: Vec<&Agent> = self.agents.iter().collect();
            agents
                .par_iter()
                .zip(targets.par_iter())
                .map(|(agent, &target)| model.compute_velocity(agent, target, &ctx))
                .collect()
        }
    }

    /// Integrate positions and handle stage transitions.  Returns the agents
    /// that reached an exit; the caller removes them.
    fn apply_velocities(&mut self, velocities: &[Point]) -> SimResult<Vec<AgentId>> {
        let dt = self.clock.dt();
        let routes = &self.routes;
        let mut removed = Vec::new();

        for (agent, &velocity) in self.agents.iter_mut().zip(velocities) {
            let next = agent.position + velocity * dt;
            if !next.is_finite() {
                return Err(SimError::Invariant(format!(
                    "agent {} position became non-finite ({next})",
                    agent.id
                )));
            }
            agent.position = next;

            let stage = routes.stage(agent.stage_id).ok_or_else(|| {
                SimError::Invariant(format!("agent {} lost stage {}", agent.id, agent.stage_id))
            })?;
            if !stage.is_reached(next) {
                continue;
            }
            if stage.is_exit() {
                removed.push(agent.id);
                continue;
            }
            // Waypoint: move on, or keep targeting it if it is the last stage.
            let journey = routes.journey(agent.journey_id).ok_or_else(|| {
                SimError::Invariant(format!("agent {} lost journey {}", agent.id, agent.journey_id))
            })?;
            if let Some((index, stage_id)) = journey.next_after(agent.stage_index) {
                agent.advance_to(index, stage_id);
                debug!(agent = %agent.id, stage = %stage_id, "waypoint reached");
            }
        }
        Ok(removed)
    }
}

impl<M: OperationalModel> std::fmt::Debug for Simulation<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("step", &self.clock.current_step)
            .field("dt", &self.clock.dt())
            .field("agents", &self.agents.len())
            .field("stages", &self.routes.stage_count())
            .field("journeys", &self.routes.journey_count())
            .field("state", &self.state)
            .finish()
    }
}
