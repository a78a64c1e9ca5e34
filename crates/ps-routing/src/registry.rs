//! `RouteRegistry` — dense storage for stages and journeys.
//!
//! Both collections are append-only `Vec`s; `StageId(i)` / `JourneyId(i)` is
//! simply the index `i`.  Lookups are O(1) and never fail for ids this
//! registry handed out.

use ps_core::{JourneyId, Point, StageId};
use ps_geometry::{validate_polygon, Polygon};

use crate::{Journey, JourneyDescription, RoutingError, RoutingResult, Stage};

#[derive(Clone, Debug, Default)]
pub struct RouteRegistry {
    stages:   Vec<Stage>,
    journeys: Vec<Journey>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an exit region.  The polygon must have at least 3 corners,
    /// enclose positive area and be simple.
    pub fn add_exit_stage(&mut self, polygon: Polygon) -> RoutingResult<StageId> {
        validate_polygon(&polygon, 0)?;
        Ok(self.push_stage(Stage::Exit { polygon: polygon.into_counter_clockwise() }))
    }

    /// Register a waypoint reached within `distance` metres of `position`.
    pub fn add_waypoint_stage(&mut self, position: Point, distance: f64) -> RoutingResult<StageId> {
        if !position.is_finite() {
            return Err(RoutingError::InvalidWaypoint(format!("position {position} is not finite")));
        }
        if !(distance.is_finite() && distance > 0.0) {
            return Err(RoutingError::InvalidWaypoint(format!(
                "distance must be finite and positive, got {distance}"
            )));
        }
        Ok(self.push_stage(Stage::Waypoint { position, distance }))
    }

    /// Validate and commit a journey.  Every stage must already be registered.
    pub fn add_journey(&mut self, description: &JourneyDescription) -> RoutingResult<JourneyId> {
        let stages = description.stages();
        if stages.is_empty() {
            return Err(RoutingError::EmptyJourney);
        }
        if let Some(&unknown) = stages.iter().find(|s| self.stage(**s).is_none()) {
            return Err(RoutingError::UnknownStage(unknown));
        }
        let id = JourneyId::from_index(self.journeys.len());
        self.journeys.push(Journey::new(stages.to_vec()));
        Ok(id)
    }

    #[inline]
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.get(id.index())
    }

    #[inline]
    pub fn journey(&self, id: JourneyId) -> Option<&Journey> {
        self.journeys.get(id.index())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn journey_count(&self) -> usize {
        self.journeys.len()
    }

    /// Iterator over `(StageId, &Stage)` in registration order.
    pub fn stages(&self) -> impl Iterator<Item = (StageId, &Stage)> + '_ {
        self.stages
            .iter()
            .enumerate()
            .map(|(i, s)| (StageId::from_index(i), s))
    }

    fn push_stage(&mut self, stage: Stage) -> StageId {
        let id = StageId::from_index(self.stages.len());
        self.stages.push(stage);
        id
    }
}
