//! Backend-neutral sink for trajectories and step summaries.

use crate::{OutputResult, StepSummaryRow, TrajectoryRow};

/// A destination for simulation output.
///
/// [`TrajectoryObserver`][crate::TrajectoryObserver] calls these from inside
/// the step loop and parks the first error instead of aborting the run.
pub trait OutputWriter {
    /// Append the positions of one snapshot.  `rows` share the same step.
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()>;

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush buffers and write trailers.  Calling it again is a no-op.
    fn finish(&mut self) -> OutputResult<()>;
}
