//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `trajectories.parquet`
//! - `step_summaries.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{OutputResult, StepSummaryRow, TrajectoryRow};

fn trajectory_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("step",     DataType::UInt64,  false),
        Field::new("agent_id", DataType::UInt64,  false),
        Field::new("x",        DataType::Float64, false),
        Field::new("y",        DataType::Float64, false),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("step",           DataType::UInt64,  false),
        Field::new("time_secs",      DataType::Float64, false),
        Field::new("live_agents",    DataType::UInt64,  false),
        Field::new("removed_agents", DataType::UInt64,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    trajectories: Option<ArrowWriter<File>>,
    summaries:    Option<ArrowWriter<File>>,
    traj_schema:  Arc<Schema>,
    summ_schema:  Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let traj_schema = trajectory_schema();
        let summ_schema = summary_schema();

        let traj_file = File::create(dir.join("trajectories.parquet"))?;
        let trajectories = ArrowWriter::try_new(
            traj_file,
            Arc::clone(&traj_schema),
            Some(snappy_props()),
        )?;

        let summ_file = File::create(dir.join("step_summaries.parquet"))?;
        let summaries = ArrowWriter::try_new(
            summ_file,
            Arc::clone(&summ_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            trajectories: Some(trajectories),
            summaries:    Some(summaries),
            traj_schema,
            summ_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.trajectories.as_mut() else {
            return Ok(());
        };

        let mut steps     = UInt64Builder::new();
        let mut agent_ids = UInt64Builder::new();
        let mut xs        = Float64Builder::new();
        let mut ys        = Float64Builder::new();

        for row in rows {
            steps.append_value(row.step);
            agent_ids.append_value(row.agent_id);
            xs.append_value(row.x);
            ys.append_value(row.y);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.traj_schema),
            vec![
                Arc::new(steps.finish()),
                Arc::new(agent_ids.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let mut steps   = UInt64Builder::new();
        let mut times   = Float64Builder::new();
        let mut live    = UInt64Builder::new();
        let mut removed = UInt64Builder::new();

        steps.append_value(row.step);
        times.append_value(row.time_secs);
        live.append_value(row.live_agents);
        removed.append_value(row.removed_agents);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summ_schema),
            vec![
                Arc::new(steps.finish()),
                Arc::new(times.finish()),
                Arc::new(live.finish()),
                Arc::new(removed.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.trajectories.take() {
            w.close()?;
        }
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        Ok(())
    }
}
