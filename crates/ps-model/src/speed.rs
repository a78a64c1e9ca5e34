//! Collision-free speed model.
//!
//! Velocity of agent `a` heading for target point `t`:
//!
//! ```text
//! v  = v0 · unit(t − a)                                           goal
//!    + Σ_b  Sn · exp((ra + rb − |a − b|) / Ln) · unit(a − b)     neighbours
//!    + Σ_w  Sg · exp((ra − |a − w|) / Lg)      · unit(a − w)     walls
//! v  = clamp_norm(v, v0)
//! |v| ≤ clamp(s / T, 0, v0)      s: free spacing to the nearest agent ahead
//! ```
//!
//! An agent held below [`STANDOFF_FRACTION`]` · v0` by a neighbour straight
//! along its goal direction steps sideways at that speed instead, to its
//! right unless the walls push it left.  Two agents meeting head-on thereby
//! pass each other instead of settling where goal and repulsion cancel.
//!
//! Neighbours and walls further than [`CUTOFF_DECAY_LENGTHS`] decay lengths
//! from the agent's surface contribute nothing.

use ps_agent::Agent;
use ps_core::Point;
use ps_geometry::Segment;

use crate::{ModelConfigError, ModelResult, OperationalModel, StepContext};

/// Interaction cut-off, in multiples of the repulsion range.
pub const CUTOFF_DECAY_LENGTHS: f64 = 10.0;

/// Fraction of `v0` below which a blocked agent sidesteps.
pub const STANDOFF_FRACTION: f64 = 0.05;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Collects and validates the four repulsion parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionFreeSpeedModelBuilder {
    strength_neighbor_repulsion: f64,
    range_neighbor_repulsion:    f64,
    strength_geometry_repulsion: f64,
    range_geometry_repulsion:    f64,
}

impl CollisionFreeSpeedModelBuilder {
    pub const DEFAULT_STRENGTH_NEIGHBOR: f64 = 8.0;
    pub const DEFAULT_RANGE_NEIGHBOR:    f64 = 0.1;
    pub const DEFAULT_STRENGTH_GEOMETRY: f64 = 5.0;
    pub const DEFAULT_RANGE_GEOMETRY:    f64 = 0.02;

    pub fn new(
        strength_neighbor_repulsion: f64,
        range_neighbor_repulsion:    f64,
        strength_geometry_repulsion: f64,
        range_geometry_repulsion:    f64,
    ) -> Self {
        Self {
            strength_neighbor_repulsion,
            range_neighbor_repulsion,
            strength_geometry_repulsion,
            range_geometry_repulsion,
        }
    }

    pub fn strength_neighbor_repulsion(mut self, v: f64) -> Self {
        self.strength_neighbor_repulsion = v;
        self
    }

    pub fn range_neighbor_repulsion(mut self, v: f64) -> Self {
        self.range_neighbor_repulsion = v;
        self
    }

    pub fn strength_geometry_repulsion(mut self, v: f64) -> Self {
        self.strength_geometry_repulsion = v;
        self
    }

    pub fn range_geometry_repulsion(mut self, v: f64) -> Self {
        self.range_geometry_repulsion = v;
        self
    }

    /// Validate and produce an immutable model.  All four parameters must be
    /// finite and strictly positive; the first offender is reported.
    pub fn build(&self) -> ModelResult<CollisionFreeSpeedModel> {
        for (name, value) in [
            ("strength_neighbor_repulsion", self.strength_neighbor_repulsion),
            ("range_neighbor_repulsion",    self.range_neighbor_repulsion),
            ("strength_geometry_repulsion", self.strength_geometry_repulsion),
            ("range_geometry_repulsion",    self.range_geometry_repulsion),
        ] {
            if !value.is_finite() {
                return Err(ModelConfigError::NonFinite { name, value });
            }
            if value <= 0.0 {
                return Err(ModelConfigError::NonPositive { name, value });
            }
        }
        Ok(CollisionFreeSpeedModel {
            strength_neighbor: self.strength_neighbor_repulsion,
            range_neighbor:    self.range_neighbor_repulsion,
            strength_geometry: self.strength_geometry_repulsion,
            range_geometry:    self.range_geometry_repulsion,
        })
    }
}

impl Default for CollisionFreeSpeedModelBuilder {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_STRENGTH_NEIGHBOR,
            Self::DEFAULT_RANGE_NEIGHBOR,
            Self::DEFAULT_STRENGTH_GEOMETRY,
            Self::DEFAULT_RANGE_GEOMETRY,
        )
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// Immutable, validated collision-free speed model.  Share via `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionFreeSpeedModel {
    strength_neighbor: f64,
    range_neighbor:    f64,
    strength_geometry: f64,
    range_geometry:    f64,
}

impl CollisionFreeSpeedModel {
    pub fn strength_neighbor_repulsion(&self) -> f64 {
        self.strength_neighbor
    }

    pub fn range_neighbor_repulsion(&self) -> f64 {
        self.range_neighbor
    }

    pub fn strength_geometry_repulsion(&self) -> f64 {
        self.strength_geometry
    }

    pub fn range_geometry_repulsion(&self) -> f64 {
        self.range_geometry
    }

    /// Surface gap beyond which neighbours are ignored.
    #[inline]
    pub fn neighbor_cutoff(&self) -> f64 {
        CUTOFF_DECAY_LENGTHS * self.range_neighbor
    }

    /// Surface gap beyond which walls are ignored.
    #[inline]
    pub fn geometry_cutoff(&self) -> f64 {
        CUTOFF_DECAY_LENGTHS * self.range_geometry
    }

    /// Push exerted on `agent` by `other`.
    pub fn neighbor_repulsion(&self, agent: &Agent, other: &Agent) -> Point {
        let d = agent.position - other.position;
        let dist = d.norm();
        let contact = agent.radius() + other.radius();
        if dist - contact >= self.neighbor_cutoff() {
            return Point::ZERO;
        }
        d.normalized() * (self.strength_neighbor * ((contact - dist) / self.range_neighbor).exp())
    }

    /// Push exerted on `agent` by `wall`, directed away from the wall.
    pub fn wall_repulsion(&self, agent: &Agent, wall: &Segment) -> Point {
        let closest = wall.closest_point(agent.position);
        let d = agent.position - closest;
        let dist = d.norm();
        let r = agent.radius();
        if dist - r >= self.geometry_cutoff() {
            return Point::ZERO;
        }
        d.normalized() * (self.strength_geometry * ((r - dist) / self.range_geometry).exp())
    }

    /// Headway speed limit for `agent` moving along unit vector `direction`.
    ///
    /// Only neighbours in front whose lateral offset is below the combined
    /// radii block the way.
    pub fn headway_speed<'b>(
        &self,
        agent:      &Agent,
        direction:  Point,
        neighbours: impl IntoIterator<Item = &'b Agent>,
    ) -> f64 {
        let v0 = agent.parameters.v0;
        let time_gap = agent.parameters.time_gap;
        neighbours
            .into_iter()
            .filter_map(|other| {
                let d = other.position - agent.position;
                let ahead = d.dot(direction);
                let contact = agent.radius() + other.radius();
                if ahead <= 0.0 || d.cross(direction).abs() >= contact {
                    return None;
                }
                Some(((ahead - contact) / time_gap).clamp(0.0, v0))
            })
            .fold(v0, f64::min)
    }

    /// Lateral escape for an agent whose way along `goal` is blocked, or
    /// `None` when no neighbour sits in its path.
    fn sidestep(
        &self,
        agent:      &Agent,
        goal:       Point,
        wall_push:  Point,
        neighbours: &[&Agent],
    ) -> Option<Point> {
        let blocked = neighbours.iter().any(|other| {
            let d = other.position - agent.position;
            d.dot(goal) > 0.0 && d.cross(goal).abs() < agent.radius() + other.radius()
        });
        if !blocked {
            return None;
        }
        let right = Point::new(goal.y, -goal.x);
        let side = if wall_push.dot(right) < 0.0 { -right } else { right };
        let speed = (STANDOFF_FRACTION * agent.parameters.v0)
            .min(self.headway_speed(agent, side, neighbours.iter().copied()));
        Some(side * speed)
    }

    /// Radius around an agent's centre that may hold an interacting neighbour.
    fn search_radius(&self, agent: &Agent, max_radius: f64) -> f64 {
        let headway_reach = agent.parameters.v0 * agent.parameters.time_gap;
        agent.radius() + max_radius + self.neighbor_cutoff().max(headway_reach)
    }
}

impl OperationalModel for CollisionFreeSpeedModel {
    fn compute_velocity(&self, agent: &Agent, target: Point, ctx: &StepContext<'_>) -> Point {
        let v0 = agent.parameters.v0;
        let radius = self.search_radius(agent, ctx.neighbours.max_radius());
        let neighbours: Vec<&Agent> = ctx.neighbours_of(agent.id, agent.position, radius).collect();

        let goal = (target - agent.position).normalized();
        let mut velocity = goal * v0;
        for other in &neighbours {
            velocity += self.neighbor_repulsion(agent, other);
        }
        let wall_reach = agent.radius() + self.geometry_cutoff();
        let mut wall_push = Point::ZERO;
        for wall in ctx.geometry.walls_within(agent.position, wall_reach) {
            wall_push += self.wall_repulsion(agent, wall);
        }
        velocity += wall_push;

        let velocity = velocity.clamp_norm(v0);
        let direction = velocity.normalized();
        let speed = if direction == Point::ZERO {
            0.0
        } else {
            velocity
                .norm()
                .min(self.headway_speed(agent, direction, neighbours.iter().copied()))
        };
        if goal != Point::ZERO && speed < STANDOFF_FRACTION * v0 {
            if let Some(step) = self.sidestep(agent, goal, wall_push, &neighbours) {
                return step;
            }
        }
        direction * speed
    }
}

impl Default for CollisionFreeSpeedModel {
    fn default() -> Self {
        CollisionFreeSpeedModel {
            strength_neighbor: CollisionFreeSpeedModelBuilder::DEFAULT_STRENGTH_NEIGHBOR,
            range_neighbor:    CollisionFreeSpeedModelBuilder::DEFAULT_RANGE_NEIGHBOR,
            strength_geometry: CollisionFreeSpeedModelBuilder::DEFAULT_STRENGTH_GEOMETRY,
            range_geometry:    CollisionFreeSpeedModelBuilder::DEFAULT_RANGE_GEOMETRY,
        }
    }
}
