//! SQLite output backend (feature `sqlite`).
//!
//! One `output.db` per run with a `trajectories` and a `step_summaries`
//! table.  The `(step, agent_id)` index used for frame-by-frame playback is
//! built once in [`finish`][OutputWriter::finish] rather than maintained
//! during inserts.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::writer::OutputWriter;
use crate::{OutputResult, StepSummaryRow, TrajectoryRow};

const SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS trajectories (
        step     INTEGER NOT NULL,
        agent_id INTEGER NOT NULL,
        x        REAL    NOT NULL,
        y        REAL    NOT NULL
    );
    CREATE TABLE IF NOT EXISTS step_summaries (
        step           INTEGER PRIMARY KEY,
        time_secs      REAL    NOT NULL,
        live_agents    INTEGER NOT NULL,
        removed_agents INTEGER NOT NULL
    );";

const INSERT_TRAJECTORY: &str =
    "INSERT INTO trajectories (step, agent_id, x, y) VALUES (?1, ?2, ?3, ?4)";

const INSERT_SUMMARY: &str =
    "INSERT OR REPLACE INTO step_summaries (step, time_secs, live_agents, removed_agents) \
     VALUES (?1, ?2, ?3, ?4)";

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and create the tables.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_trajectories(&mut self, rows: &[TrajectoryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        // One transaction per snapshot.
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_TRAJECTORY)?;
            for row in rows {
                stmt.execute(params![row.step, row.agent_id, row.x, row.y])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_SUMMARY)?;
        stmt.execute(params![row.step, row.time_secs, row.live_agents, row.removed_agents])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS trajectories_by_step ON trajectories (step, agent_id);
             PRAGMA wal_checkpoint(TRUNCATE);",
        )?;
        debug!("sqlite output finalised");
        Ok(())
    }
}
