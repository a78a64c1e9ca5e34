use ps_agent::AgentError;
use ps_core::{AgentId, CoreError, JourneyId, Point, StageId};
use ps_geometry::GeometryError;
use ps_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("journey {0} is not registered")]
    UnknownJourney(JourneyId),

    #[error("stage {0} is not registered")]
    UnknownStage(StageId),

    #[error("agent {0} is not in the simulation")]
    UnknownAgent(AgentId),

    #[error("stage {stage} is not part of journey {journey}")]
    StageNotInJourney { stage: StageId, journey: JourneyId },

    #[error("journey has no stages")]
    EmptyJourney,

    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("invalid waypoint: {0}")]
    InvalidWaypoint(String),

    #[error("invalid agent parameters: {0}")]
    InvalidAgentParameters(#[from] AgentError),

    #[error("agent position {position} lies outside the walkable area")]
    AgentOutsideGeometry { position: Point },

    #[error("time step must be finite and > 0, got {0}")]
    InvalidTimeStep(f64),

    #[error("simulation invariant violated: {0}")]
    Invariant(String),

    #[error("simulation was terminated by an earlier error")]
    Terminated,
}

impl From<RoutingError> for SimError {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::InvalidGeometry(g) => SimError::InvalidGeometry(g),
            RoutingError::InvalidWaypoint(msg) => SimError::InvalidWaypoint(msg),
            RoutingError::UnknownStage(id) => SimError::UnknownStage(id),
            RoutingError::EmptyJourney => SimError::EmptyJourney,
        }
    }
}

impl From<CoreError> for SimError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidTimeStep(dt) => SimError::InvalidTimeStep(dt),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
