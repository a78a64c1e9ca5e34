//! Journey description (under construction) and registered journey.

use ps_core::StageId;

/// Mutable list of stages, committed with
/// [`RouteRegistry::add_journey`][crate::RouteRegistry::add_journey].
///
/// Stage ids are not checked here; the registry validates them on commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JourneyDescription {
    stages: Vec<StageId>,
}

impl JourneyDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `stage` to the end of the journey.
    pub fn add_stage(&mut self, stage: StageId) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Builder-style variant of [`add_stage`](Self::add_stage).
    pub fn with_stage(mut self, stage: StageId) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }
}

impl FromIterator<StageId> for JourneyDescription {
    fn from_iter<I: IntoIterator<Item = StageId>>(iter: I) -> Self {
        Self { stages: iter.into_iter().collect() }
    }
}

/// An immutable, validated sequence of stages.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journey {
    stages: Vec<StageId>,
}

impl Journey {
    /// Only the registry constructs journeys, after validating stage ids.
    pub(crate) fn new(stages: Vec<StageId>) -> Self {
        debug_assert!(!stages.is_empty());
        Self { stages }
    }

    pub fn stages(&self) -> &[StageId] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage at position `index`, if in range.
    #[inline]
    pub fn stage_at(&self, index: usize) -> Option<StageId> {
        self.stages.get(index).copied()
    }

    /// Position of the first occurrence of `stage`.
    pub fn position_of(&self, stage: StageId) -> Option<usize> {
        self.stages.iter().position(|&s| s == stage)
    }

    pub fn contains(&self, stage: StageId) -> bool {
        self.stages.contains(&stage)
    }

    /// `(index, stage)` that follows `index`, or `None` at the last stage.
    pub fn next_after(&self, index: usize) -> Option<(usize, StageId)> {
        let next = index + 1;
        self.stage_at(next).map(|s| (next, s))
    }
}
