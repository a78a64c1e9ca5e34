//! The `OperationalModel` trait — the seam between simulation and dynamics.

use ps_agent::Agent;
use ps_core::Point;

use crate::StepContext;

/// Pluggable pedestrian dynamics.
///
/// Given one agent, the point it steers towards and a read-only view of the
/// rest of the world, return the agent's velocity for this step.  The
/// simulation integrates `position += velocity * dt` afterwards.
///
/// # Thread safety
///
/// With the `parallel` feature ps-sim calls `compute_velocity` for many
/// agents at once on Rayon's pool, so implementations must be
/// `Send + Sync`.  The result must depend only on the arguments.
///
/// # Example
///
/// ```rust,ignore
/// struct StraightLine;
///
/// impl OperationalModel for StraightLine {
///     fn compute_velocity(&self, agent: &Agent, target: Point, _ctx: &StepContext<'_>) -> Point {
///         (target - agent.position).normalized() * agent.parameters.v0
///     }
/// }
/// ```
pub trait OperationalModel: Send + Sync + 'static {
    fn compute_velocity(&self, agent: &Agent, target: Point, ctx: &StepContext<'_>) -> Point;
}
