//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trajectories.csv`
//! - `step_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{OutputResult, StepSummaryRow, TrajectoryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    trajectories: Writer<File>,
    summaries:    Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` (which must exist) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trajectories = Writer::from_path(dir.join("trajectories.csv"))?;
        trajectories.write_record(["step", "agent_id", "x", "y"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["step", "time_secs", "live_agents", "removed_agents"])?;

        Ok(Self {
            trajectories,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        for row in rows {
            self.trajectories.write_record(&[
                row.step.to_string(),
                row.agent_id.to_string(),
                format!("{:.4}", row.x),
                format!("{:.4}", row.y),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            format!("{:.3}", row.time_secs),
            row.live_agents.to_string(),
            row.removed_agents.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trajectories.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
