//! Stage types — the regions agents walk towards.

use ps_core::Point;
use ps_geometry::Polygon;

/// Discriminant of [`Stage`], handy for output and logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageKind {
    Exit,
    Waypoint,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::Exit     => "exit",
            StageKind::Waypoint => "waypoint",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigational target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    /// Agents whose position enters `polygon` leave the simulation.
    Exit { polygon: Polygon },

    /// Reached once an agent is within `distance` of `position`; the agent
    /// then continues with the next stage of its journey.
    Waypoint { position: Point, distance: f64 },
}

impl Stage {
    #[inline]
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Exit { .. }     => StageKind::Exit,
            Stage::Waypoint { .. } => StageKind::Waypoint,
        }
    }

    #[inline]
    pub fn is_exit(&self) -> bool {
        matches!(self, Stage::Exit { .. })
    }

    /// The point an agent at `from` steers towards.
    ///
    /// Exits: the nearest point of the exit outline (or `from` itself once
    /// inside).  Waypoints: the waypoint position.
    pub fn target_point(&self, from: Point) -> Point {
        match self {
            Stage::Exit { polygon } => {
                if polygon.contains(from) {
                    from
                } else {
                    polygon.closest_boundary_point(from)
                }
            }
            Stage::Waypoint { position, .. } => *position,
        }
    }

    /// `true` once an agent at `p` has completed this stage.
    pub fn is_reached(&self, p: Point) -> bool {
        match self {
            Stage::Exit { polygon } => polygon.contains(p),
            Stage::Waypoint { position, distance } => p.distance(*position) <= *distance,
        }
    }

    /// Representative point (exit centroid or waypoint position).
    pub fn centre(&self) -> Point {
        match self {
            Stage::Exit { polygon }          => polygon.centroid(),
            Stage::Waypoint { position, .. } => *position,
        }
    }
}
