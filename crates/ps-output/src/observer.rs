//! `TrajectoryObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ps_agent::AgentRegistry;
use ps_core::Step;
use ps_sim::{SimObserver, StepReport};
use tracing::warn;

use crate::row::{StepSummaryRow, TrajectoryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent positions and step summaries to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct TrajectoryObserver<W: OutputWriter> {
    writer:     W,
    dt:         f64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TrajectoryObserver<W> {
    /// Create an observer backed by `writer`; `dt` converts steps to seconds.
    pub fn new(writer: W, dt: f64) -> Self {
        Self { writer, dt, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for TrajectoryObserver<W> {
    fn on_step_end(&mut self, report: &StepReport) {
        let step = report.step.0 + 1;
        let row = StepSummaryRow {
            step,
            time_secs:      step as f64 * self.dt,
            live_agents:    report.live_agents as u64,
            removed_agents: report.removed.len() as u64,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, _elapsed_secs: f64, agents: &AgentRegistry) {
        let rows: Vec<TrajectoryRow> = agents
            .iter()
            .map(|a| TrajectoryRow {
                step:     step.0,
                agent_id: a.id.0,
                x:        a.position.x,
                y:        a.position.y,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_trajectories(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_step: Step) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
