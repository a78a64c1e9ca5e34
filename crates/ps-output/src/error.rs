use thiserror::Error;

/// Failure of an output backend.  Writers never panic on I/O problems; the
/// observer keeps the first of these for the caller.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite output failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow batch could not be built: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet output failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type OutputResult<T> = Result<T, OutputError>;
