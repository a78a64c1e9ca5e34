//! Plain data row types written by output backends.

/// Position of one agent after a given step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub step:     u64,
    pub agent_id: u64,
    pub x:        f64,
    pub y:        f64,
}

/// Summary statistics for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:           u64,
    pub time_secs:      f64,
    pub live_agents:    u64,
    /// Agents that reached an exit during this step.
    pub removed_agents: u64,
}
