//! Walkable-area representation and builder.
//!
//! # Data layout
//!
//! A [`Geometry`] is the union of one or more accessible-area polygons.  The
//! *walls* are the edges of the union's outline (outer rings and holes), so
//! edges shared by adjacent areas and edges lying inside another area are not
//! walls.  Walls are kept in a flat `Vec<Segment>` and bulk-loaded into an
//! R-tree so the operational model can ask "which walls are within r of this
//! agent?" in O(log W + k) instead of scanning all W walls per agent per step.

use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ps_core::Point;

use crate::polygon::EPS;
use crate::{GeometryError, GeometryResult, Polygon, Segment};

// ── R-tree wall entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree.
#[derive(Clone)]
struct WallEntry {
    segment: Segment,
}

impl RTreeObject for WallEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        let (lo, hi) = self.segment.bounds();
        AABB::from_corners([lo.x, lo.y], [hi.x, hi.y])
    }
}

impl PointDistance for WallEntry {
    /// Exact squared Euclidean distance from `point` to the segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = Point::new(point[0], point[1]);
        let c = self.segment.closest_point(p);
        (p - c).norm_squared()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Immutable walkable area.
///
/// Do not construct directly; use [`GeometryBuilder`].  A `Geometry` is
/// `Send + Sync` and is shared between simulations behind an `Arc`.
pub struct Geometry {
    polygons: Vec<Polygon>,
    walls:    Vec<Segment>,
    area:     f64,
    wall_idx: RTree<WallEntry>,
}

impl Geometry {
    /// Accessible-area polygons, counter-clockwise, in insertion order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Boundary segments of the union.
    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Area of the union; overlaps are counted once.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// `true` if `p` lies in any accessible area (boundary inclusive).
    pub fn contains(&self, p: Point) -> bool {
        self.polygons.iter().any(|poly| poly.contains(p))
    }

    /// Walls whose closest point lies within `radius` of `p`.
    pub fn walls_within(&self, p: Point, radius: f64) -> impl Iterator<Item = &Segment> + '_ {
        self.wall_idx
            .locate_within_distance([p.x, p.y], radius * radius)
            .map(|e| &e.segment)
    }
}

impl std::fmt::Debug for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geometry")
            .field("polygons", &self.polygons.len())
            .field("walls", &self.walls.len())
            .field("area", &self.area)
            .finish()
    }
}

// ── Union outline ─────────────────────────────────────────────────────────────

fn to_geo(poly: &Polygon) -> geo::Polygon<f64> {
    let ring: Vec<Coord<f64>> = poly.points().iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    geo::Polygon::new(LineString::new(ring), Vec::new())
}

/// Outline segments and area of the union of validated `polygons`.
fn union_outline(polygons: &[Polygon]) -> (Vec<Segment>, f64) {
    if let [single] = polygons {
        return (single.edges().collect(), single.area());
    }

    let union = polygons
        .iter()
        .map(|p| MultiPolygon::new(vec![to_geo(p)]))
        .reduce(|acc, next| acc.union(&next))
        .unwrap_or_else(|| MultiPolygon::new(Vec::new()));

    let walls = union
        .iter()
        .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
        .flat_map(|ring| ring.lines())
        .map(|line| {
            Segment::new(Point::new(line.start.x, line.start.y), Point::new(line.end.x, line.end.y))
        })
        .filter(|seg| seg.length() > EPS)
        .collect();
    (walls, union.unsigned_area())
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Check one polygon: at least 3 corners, finite, non-zero area, simple.
/// `index` is only used for error reporting.
pub fn validate_polygon(poly: &Polygon, index: usize) -> GeometryResult<()> {
    if poly.len() < 3 {
        return Err(GeometryError::TooFewPoints { polygon: index, points: poly.len() });
    }
    if !poly.is_finite() {
        return Err(GeometryError::NonFinite { polygon: index });
    }
    if poly.area() <= EPS {
        return Err(GeometryError::ZeroArea { polygon: index });
    }
    if !poly.is_simple() {
        return Err(GeometryError::SelfIntersection { polygon: index });
    }
    Ok(())
}

// ── GeometryBuilder ───────────────────────────────────────────────────────────

/// Collect accessible areas, then call [`build`](Self::build).
///
/// `build` borrows the builder and snapshots the polygons accumulated so far,
/// so one builder can produce several geometries (e.g. before and after adding
/// an extra area).
///
/// # Example
///
/// ```
/// use ps_core::Point;
/// use ps_geometry::{GeometryBuilder, Polygon};
///
/// let mut b = GeometryBuilder::new();
/// b.add_accessible_area(Polygon::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
/// let geo = b.build().unwrap();
/// assert_eq!(geo.wall_count(), 4);
/// assert!((geo.area() - 100.0).abs() < 1e-9);
/// ```
#[derive(Default, Clone)]
pub struct GeometryBuilder {
    polygons: Vec<Polygon>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accessible area.  Validation is deferred to `build`.
    pub fn add_accessible_area(&mut self, polygon: impl Into<Polygon>) -> &mut Self {
        self.polygons.push(polygon.into());
        self
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Validate every polygon, merge them and produce an immutable
    /// [`Geometry`].  A single area is used as is; several areas are merged
    /// with a polygon union.
    pub fn build(&self) -> GeometryResult<Geometry> {
        if self.polygons.is_empty() {
            return Err(GeometryError::Empty);
        }
        for (i, poly) in self.polygons.iter().enumerate() {
            validate_polygon(poly, i)?;
        }

        let polygons: Vec<Polygon> = self
            .polygons
            .iter()
            .cloned()
            .map(Polygon::into_counter_clockwise)
            .collect();

        let (walls, area) = union_outline(&polygons);

        let entries: Vec<WallEntry> = walls.iter().map(|&segment| WallEntry { segment }).collect();
        let wall_idx = RTree::bulk_load(entries);

        Ok(Geometry { polygons, walls, area, wall_idx })
    }
}
