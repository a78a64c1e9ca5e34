use std::path::PathBuf;

use ps_geometry::GeometryError;
use ps_model::ModelConfigError;
use ps_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("could not read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scenario geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("invalid model parameters: {0}")]
    Model(#[from] ModelConfigError),

    #[error("simulation setup failed: {0}")]
    Sim(#[from] SimError),

    #[error("scenario has no exits")]
    NoExits,

    #[error("unsupported scenario format {0:?} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
