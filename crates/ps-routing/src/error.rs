use ps_core::StageId;
use ps_geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("invalid stage geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("invalid waypoint: {0}")]
    InvalidWaypoint(String),

    #[error("stage {0} is not registered")]
    UnknownStage(StageId),

    #[error("journey has no stages")]
    EmptyJourney,
}

pub type RoutingResult<T> = Result<T, RoutingError>;
