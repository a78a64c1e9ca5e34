//! `ps-output` — trajectory writers for the rust_ped simulator.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                          |
//! |-----------|-------------|--------------------------------------------------------|
//! | *(none)*  | CSV         | `trajectories.csv`, `step_summaries.csv`               |
//! | `sqlite`  | SQLite      | `output.db`                                            |
//! | `parquet` | Parquet     | `trajectories.parquet`, `step_summaries.parquet`       |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`TrajectoryObserver`], which implements `ps_sim::SimObserver`.
//!
//! # Step numbering
//!
//! Rows are labelled with the number of completed iterations, so step `k`
//! is the state after `k` calls to `iterate` and `time_secs = k · dt`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ps_output::{CsvWriter, TrajectoryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TrajectoryObserver::new(writer, sim.dt());
//! sim.run_until_empty(10_000, &mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TrajectoryObserver;
pub use row::{StepSummaryRow, TrajectoryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
