//! Simulation observer trait for progress reporting and data collection.

use ps_agent::AgentRegistry;
use ps_core::{AgentId, Step};

use crate::StepReport;

/// Callbacks invoked by [`Simulation::run_steps`][crate::Simulation::run_steps]
/// and [`Simulation::run_until_empty`][crate::Simulation::run_until_empty].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, report: &StepReport) {
///         if report.step.0 % self.interval == 0 {
///             println!("{}: {} agents left", report.step, report.live_agents);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before a step is computed.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called after a step completed successfully.
    fn on_step_end(&mut self, _report: &StepReport) {}

    /// Called every `output_interval` steps with the state *after* the step.
    ///
    /// `step` counts completed iterations, so the first snapshot of a run
    /// with interval 1 is `Step(1)`.
    fn on_snapshot(&mut self, _step: Step, _elapsed_secs: f64, _agents: &AgentRegistry) {}

    /// Called once per agent removed at an exit during `step`.
    fn on_agent_removed(&mut self, _step: Step, _agent: AgentId) {}

    /// Called once when a run finishes without error.
    fn on_sim_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
