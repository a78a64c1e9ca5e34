//! Integration tests for ps-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{StepSummaryRow, TrajectoryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn traj_row(agent_id: u64, step: u64) -> TrajectoryRow {
        TrajectoryRow { step, agent_id, x: agent_id as f64 + 0.5, y: 2.25 }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("trajectories.csv").exists());
        assert!(dir.path().join("step_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["step", "agent_id", "x", "y"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["step", "time_secs", "live_agents", "removed_agents"]);
    }

    #[test]
    fn csv_trajectory_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![traj_row(1, 5), traj_row(2, 5), traj_row(3, 5)];
        w.write_trajectories(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 3);
        assert_eq!(&read_rows[0][0], "5");      // step
        assert_eq!(&read_rows[0][1], "1");      // agent_id
        assert_eq!(&read_rows[0][2], "1.5000"); // x
        assert_eq!(&read_rows[0][3], "2.2500"); // y
        assert_eq!(&read_rows[2][1], "3");
    }

    #[test]
    fn csv_step_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step: 300, time_secs: 3.0, live_agents: 4, removed_agents: 1,
        }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][0], "300");
        assert_eq!(&read_rows[0][1], "3.000");
        assert_eq!(&read_rows[0][2], "4");
        assert_eq!(&read_rows[0][3], "1");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_directory_errors() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("does/not/exist")).is_err());
    }
}

// ── Observer driven by a real simulation ──────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use ps_agent::AgentSpec;
    use ps_core::Point;
    use ps_geometry::{GeometryBuilder, Polygon};
    use ps_model::CollisionFreeSpeedModelBuilder;
    use ps_routing::JourneyDescription;
    use ps_sim::{Simulation, SimulationBuilder};

    use crate::{CsvWriter, OutputError, OutputResult, OutputWriter, StepSummaryRow, TrajectoryObserver, TrajectoryRow};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// 10×10 room, exit at the right wall, one agent close to it and one far.
    fn small_sim(output_interval: u64) -> Simulation {
        let mut gb = GeometryBuilder::new();
        gb.add_accessible_area(Polygon::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
        let geometry = Arc::new(gb.build().unwrap());
        let model = Arc::new(CollisionFreeSpeedModelBuilder::default().build().unwrap());
        let mut sim = SimulationBuilder::new(geometry, model)
            .dt(0.01)
            .output_interval(output_interval)
            .build()
            .unwrap();
        let exit = sim
            .add_exit_stage(Polygon::rectangle(Point::new(9.0, 0.0), Point::new(10.0, 10.0)))
            .unwrap();
        let journey = sim.add_journey(&JourneyDescription::new().with_stage(exit)).unwrap();
        sim.add_agent(AgentSpec::new(Point::new(8.995, 5.0), journey, exit)).unwrap();
        sim.add_agent(AgentSpec::new(Point::new(1.0, 2.0), journey, exit)).unwrap();
        sim
    }

    #[test]
    fn integration_csv() {
        let mut sim = small_sim(2);
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = TrajectoryObserver::new(writer, sim.dt());
        sim.run_steps(6, &mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Agent 1 leaves on step 0; snapshots at steps 2, 4, 6 hold only agent 2.
        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3, "expected 3 snapshots × 1 agent");
        assert!(rows.iter().all(|r| &r[1] == "2"));
        assert_eq!(&rows[0][0], "2");
        assert_eq!(&rows[2][0], "6");

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(summaries.len(), 6);
        assert_eq!(&summaries[0][0], "1");
        assert_eq!(&summaries[0][1], "0.010");
        assert_eq!(&summaries[0][2], "1"); // live after step
        assert_eq!(&summaries[0][3], "1"); // removed in step
        assert_eq!(&summaries[5][3], "0");
    }

    /// Writer that fails every call after the first success.
    struct Flaky {
        calls: usize,
    }

    impl OutputWriter for Flaky {
        fn write_trajectories(&mut self, _rows: &[TrajectoryRow]) -> OutputResult<()> {
            self.fail()
        }
        fn write_step_summary(&mut self, _row: &StepSummaryRow) -> OutputResult<()> {
            self.fail()
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    impl Flaky {
        fn fail(&mut self) -> OutputResult<()> {
            self.calls += 1;
            if self.calls == 1 {
                Ok(())
            } else {
                Err(OutputError::Io(std::io::Error::other(format!("call {}", self.calls))))
            }
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = small_sim(1);
        let mut obs = TrajectoryObserver::new(Flaky { calls: 0 }, sim.dt());
        sim.run_steps(3, &mut obs).unwrap();

        let err = obs.take_error().expect("error stored");
        assert_eq!(err.to_string(), "output I/O failed: call 2");
        assert!(obs.take_error().is_none(), "take_error clears the slot");
        assert!(obs.into_writer().calls > 2);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{StepSummaryRow, TrajectoryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_trajectory_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows = vec![
            TrajectoryRow { step: 1, agent_id: 1, x: 0.5, y: 1.0 },
            TrajectoryRow { step: 1, agent_id: 2, x: 1.5, y: 1.0 },
            TrajectoryRow { step: 1, agent_id: 3, x: 2.5, y: 1.0 },
        ];
        w.write_trajectories(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM trajectories", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_positions_stored_as_real() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_trajectories(&[TrajectoryRow { step: 0, agent_id: 7, x: 3.125, y: -0.5 }]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (x, y): (f64, f64) = conn.query_row(
            "SELECT x, y FROM trajectories WHERE agent_id = 7", [], |r| Ok((r.get(0)?, r.get(1)?))
        ).unwrap();
        assert_eq!(x, 3.125);
        assert_eq!(y, -0.5);
    }

    #[test]
    fn sqlite_step_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step: 7, time_secs: 0.07, live_agents: 42, removed_agents: 2,
        }).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (step, live, removed): (i64, i64, i64) = conn.query_row(
            "SELECT step, live_agents, removed_agents FROM step_summaries WHERE step = 7",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        ).unwrap();
        assert_eq!(step, 7);
        assert_eq!(live, 42);
        assert_eq!(removed, 2);
    }

    #[test]
    fn sqlite_finish_builds_step_index() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'trajectories_by_step'",
            [],
            |r| r.get(0),
        ).unwrap();
        assert_eq!(count, 1);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::ParquetWriter;
    use crate::row::TrajectoryRow;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("trajectories.parquet").exists());
        assert!(dir.path().join("step_summaries.parquet").exists());
    }

    #[test]
    fn parquet_trajectory_rows_and_schema() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        let rows = vec![
            TrajectoryRow { step: 2, agent_id: 1, x: 1.0, y: 2.0 },
            TrajectoryRow { step: 2, agent_id: 2, x: 3.0, y: 4.0 },
        ];
        w.write_trajectories(&rows).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("trajectories.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 2, "expected 2 rows");

        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(field_names, ["step", "agent_id", "x", "y"]);
        assert_eq!(*schema.field_with_name("x").unwrap().data_type(), DataType::Float64);
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_trajectories(&[TrajectoryRow { step: 0, agent_id: 1, x: 0.0, y: 0.0 }]).unwrap();
            // Dropped without finish(): no footer is written.
        }

        let file = std::fs::File::open(dir.path().join("trajectories.parquet")).unwrap();
        let result = ParquetRecordBatchReaderBuilder::try_new(file);
        assert!(result.is_err(), "file without Parquet footer should fail to open");
    }
}
