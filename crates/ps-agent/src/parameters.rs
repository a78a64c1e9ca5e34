//! Per-agent model parameters.

use crate::{AgentError, AgentResult};

/// Parameters of one agent for the collision-free speed model.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentParameters {
    /// Desired (free-flow) speed in m/s.
    pub v0: f64,
    /// Body radius in metres.
    pub radius: f64,
    /// Minimum time headway to the agent in front, in seconds.
    pub time_gap: f64,
}

impl AgentParameters {
    pub const DEFAULT_V0:       f64 = 1.2;
    pub const DEFAULT_RADIUS:   f64 = 0.3;
    pub const DEFAULT_TIME_GAP: f64 = 1.0;

    pub fn new(v0: f64, radius: f64, time_gap: f64) -> Self {
        Self { v0, radius, time_gap }
    }

    /// Every field must be finite and strictly positive.
    pub fn validate(&self) -> AgentResult<()> {
        for (name, value) in [
            ("v0", self.v0),
            ("radius", self.radius),
            ("time_gap", self.time_gap),
        ] {
            if !value.is_finite() {
                return Err(AgentError::NonFinite { name, value });
            }
            if value <= 0.0 {
                return Err(AgentError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}

impl Default for AgentParameters {
    fn default() -> Self {
        Self {
            v0:       Self::DEFAULT_V0,
            radius:   Self::DEFAULT_RADIUS,
            time_gap: Self::DEFAULT_TIME_GAP,
        }
    }
}
