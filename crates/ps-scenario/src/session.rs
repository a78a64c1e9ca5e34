//! `Session` — owns the simulation a host application steps frame by frame.

use std::fmt;

use ps_agent::AgentSnapshot;
use ps_core::Step;
use ps_sim::{SimResult, Simulation};
use tracing::{error, info};

use crate::{Scenario, ScenarioResult};

/// Lifecycle of a [`Session`] as reported to the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No simulation exists (never initialised, or dropped after an error).
    NotStarted,
    /// Agents remain in the simulation.
    Running,
    /// Every agent has left.
    Finished,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "not started",
            SessionStatus::Running    => "running",
            SessionStatus::Finished   => "finished",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
pub struct Session {
    sim: Option<Simulation>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a simulation from `scenario`, replacing any existing one.
    ///
    /// On error the previous simulation is kept.
    pub fn init(&mut self, scenario: &Scenario) -> ScenarioResult<()> {
        let sim = scenario.build_simulation()?;
        info!(agents = sim.agent_count(), "session initialised");
        self.sim = Some(sim);
        Ok(())
    }

    /// Discard the current simulation and start over from `scenario`.
    pub fn reset(&mut self, scenario: &Scenario) -> ScenarioResult<()> {
        if self.sim.take().is_some() {
            info!("session reset");
        }
        self.init(scenario)
    }

    /// Advance one iteration and return the positions afterwards.
    ///
    /// Without a simulation this is a no-op returning no positions.  A failed
    /// iteration drops the simulation; the session must be reset.
    pub fn step(&mut self) -> SimResult<Vec<AgentSnapshot>> {
        let Some(sim) = self.sim.as_mut() else {
            return Ok(Vec::new());
        };
        match sim.iterate() {
            Ok(report) => {
                if report.live_agents == 0 && !report.removed.is_empty() {
                    info!(step = %report.step, "all agents left, session finished");
                }
                Ok(sim.agents().collect())
            }
            Err(e) => {
                error!(error = %e, "step failed, dropping simulation");
                self.sim = None;
                Err(e)
            }
        }
    }

    /// Current agent positions in id order.
    pub fn positions(&self) -> Vec<AgentSnapshot> {
        self.sim
            .as_ref()
            .map(|sim| sim.agents().collect())
            .unwrap_or_default()
    }

    pub fn status(&self) -> SessionStatus {
        match &self.sim {
            None => SessionStatus::NotStarted,
            Some(sim) if sim.agent_count() == 0 => SessionStatus::Finished,
            Some(_) => SessionStatus::Running,
        }
    }

    /// Iterations completed by the current simulation.
    pub fn current_step(&self) -> Option<Step> {
        self.sim.as_ref().map(Simulation::current_step)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }
}
