//! Live agent state.

use ps_core::{AgentId, JourneyId, Point, StageId};

use crate::AgentParameters;

/// Everything needed to add an agent to a simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSpec {
    pub position:   Point,
    pub journey_id: JourneyId,
    /// Stage to start at.  Must be a member of the journey.
    pub stage_id:   StageId,
    pub parameters: AgentParameters,
}

impl AgentSpec {
    /// Spec with default parameters.
    pub fn new(position: Point, journey_id: JourneyId, stage_id: StageId) -> Self {
        Self { position, journey_id, stage_id, parameters: AgentParameters::default() }
    }

    pub fn with_parameters(mut self, parameters: AgentParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// One pedestrian.
///
/// `stage_index` is the position of `stage_id` inside the journey; both are
/// kept so that journeys visiting the same stage twice advance correctly.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:          AgentId,
    pub position:    Point,
    pub journey_id:  JourneyId,
    pub stage_id:    StageId,
    pub stage_index: usize,
    pub parameters:  AgentParameters,
}

impl Agent {
    #[inline]
    pub fn radius(&self) -> f64 {
        self.parameters.radius
    }

    /// Move to `stage` at position `index` of the journey.
    pub fn advance_to(&mut self, index: usize, stage: StageId) {
        self.stage_index = index;
        self.stage_id = stage;
    }
}
