//! Seeded random placement of agents inside a polygon.
//!
//! Rejection sampling over the polygon's bounding box: a candidate is kept if
//! it lies inside the polygon, at least `min_wall_distance` from its outline,
//! and at least `min_spacing` from every previously accepted point.  The same
//! seed always produces the same positions.

use ps_core::{Point, SimRng};

use crate::geometry::validate_polygon;
use crate::{GeometryError, GeometryResult, Polygon};

/// Candidate draws allowed per requested agent before giving up.
const ATTEMPTS_PER_AGENT: usize = 10_000;

/// Place `count` points uniformly at random inside `polygon`.
///
/// Fails with [`GeometryError::DistributionFailed`] if the constraints are
/// too tight to fit `count` points within the attempt budget.
pub fn distribute_by_number(
    polygon:           &Polygon,
    count:             usize,
    min_spacing:       f64,
    min_wall_distance: f64,
    seed:              u64,
) -> GeometryResult<Vec<Point>> {
    validate_polygon(polygon, 0)?;
    if !(min_spacing.is_finite() && min_spacing >= 0.0) {
        return Err(GeometryError::InvalidDistribution(format!(
            "min_spacing must be finite and non-negative, got {min_spacing}"
        )));
    }
    if !(min_wall_distance.is_finite() && min_wall_distance >= 0.0) {
        return Err(GeometryError::InvalidDistribution(format!(
            "min_wall_distance must be finite and non-negative, got {min_wall_distance}"
        )));
    }

    let (lo, hi) = polygon.bounds();
    let mut rng = SimRng::new(seed);
    let mut placed: Vec<Point> = Vec::with_capacity(count);
    let budget = count.saturating_mul(ATTEMPTS_PER_AGENT);
    let spacing2 = min_spacing * min_spacing;

    let mut attempts = 0;
    while placed.len() < count && attempts < budget {
        attempts += 1;
        let candidate = Point::new(rng.gen_range(lo.x..=hi.x), rng.gen_range(lo.y..=hi.y));

        if !polygon.contains(candidate) {
            continue;
        }
        if polygon.distance_to_boundary(candidate) < min_wall_distance {
            continue;
        }
        if placed.iter().any(|&p| (p - candidate).norm_squared() < spacing2) {
            continue;
        }
        placed.push(candidate);
    }

    if placed.len() < count {
        return Err(GeometryError::DistributionFailed { requested: count, placed: placed.len() });
    }
    Ok(placed)
}
