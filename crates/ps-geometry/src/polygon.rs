//! Planar polygon and segment primitives.
//!
//! Polygons are stored *open*: the closing edge from the last vertex back to
//! the first is implicit.  A duplicated closing vertex (as produced by closed
//! polylines) and repeated consecutive vertices are stripped on construction,
//! so `len()` is the number of distinct corners.

use ps_core::Point;

/// Tolerance for orientation tests and boundary membership, in metres².
pub(crate) const EPS: f64 = 1e-10;

// ── Segment ───────────────────────────────────────────────────────────────────

/// A straight line segment between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Point on the segment nearest to `p`.
    pub fn closest_point(&self, p: Point) -> Point {
        let ab = self.b - self.a;
        let len2 = ab.norm_squared();
        if len2 <= f64::EPSILON {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len2).clamp(0.0, 1.0);
        self.a + ab * t
    }

    #[inline]
    pub fn distance_to(&self, p: Point) -> f64 {
        p.distance(self.closest_point(p))
    }

    /// `true` if the two segments share at least one point (crossing,
    /// touching, or collinear overlap).
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = orient(other.a, other.b, self.a);
        let d2 = orient(other.a, other.b, self.b);
        let d3 = orient(self.a, self.b, other.a);
        let d4 = orient(self.a, self.b, other.b);

        let straddles = |p: f64, q: f64| (p > EPS && q < -EPS) || (p < -EPS && q > EPS);
        if straddles(d1, d2) && straddles(d3, d4) {
            return true;
        }

        (d1.abs() <= EPS && other.bbox_contains(self.a))
            || (d2.abs() <= EPS && other.bbox_contains(self.b))
            || (d3.abs() <= EPS && self.bbox_contains(other.a))
            || (d4.abs() <= EPS && self.bbox_contains(other.b))
    }

    /// Axis-aligned `(min, max)` corners.
    pub fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            Point::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        )
    }

    fn bbox_contains(&self, p: Point) -> bool {
        let (lo, hi) = self.bounds();
        p.x >= lo.x - EPS && p.x <= hi.x + EPS && p.y >= lo.y - EPS && p.y <= hi.y + EPS
    }
}

/// Twice the signed area of triangle `(a, b, c)`; positive for a
/// counter-clockwise turn.
#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

// ── Polygon ───────────────────────────────────────────────────────────────────

/// A closed polygon given by its corner points.
///
/// Construction never fails; validity (simplicity, area) is checked by
/// [`GeometryBuilder::build`][crate::GeometryBuilder::build] and by stage
/// registration, which need to report *which* polygon is broken.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Build from corner points.  A trailing copy of the first point and
    /// consecutive duplicates are removed.
    pub fn new(points: Vec<Point>) -> Self {
        let mut pts: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
        while pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        Self { points: pts }
    }

    /// Convenience constructor from `[x, y]` pairs.
    pub fn from_coords(coords: &[[f64; 2]]) -> Self {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    /// Axis-aligned rectangle with corners `min` and `max`, counter-clockwise.
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::new(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterator over the closed ring of edges.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace signed area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum();
        twice * 0.5
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Same polygon with counter-clockwise winding.
    pub fn into_counter_clockwise(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
        self
    }

    /// Area centroid.  Falls back to the vertex mean for degenerate rings.
    pub fn centroid(&self) -> Point {
        let n = self.points.len();
        if n == 0 {
            return Point::ZERO;
        }
        let area = self.signed_area();
        if area.abs() <= EPS {
            let sum = self.points.iter().fold(Point::ZERO, |acc, &p| acc + p);
            return sum * (1.0 / n as f64);
        }
        let mut c = Point::ZERO;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            c += (p + q) * p.cross(q);
        }
        c * (1.0 / (6.0 * area))
    }

    /// `(min, max)` bounding-box corners.
    pub fn bounds(&self) -> (Point, Point) {
        let mut lo = Point::new(f64::INFINITY, f64::INFINITY);
        let mut hi = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            lo.x = lo.x.min(p.x);
            lo.y = lo.y.min(p.y);
            hi.x = hi.x.max(p.x);
            hi.y = hi.y.max(p.y);
        }
        (lo, hi)
    }

    /// Point-in-polygon test.  Points on the boundary count as inside.
    pub fn contains(&self, p: Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        if self.distance_to_boundary(p) <= 1e-9 {
            return true;
        }
        // Even-odd ray cast towards +x.
        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > p.y) != (pj.y > p.y) {
                let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Nearest point on the polygon outline.
    pub fn closest_boundary_point(&self, p: Point) -> Point {
        self.edges()
            .map(|e| e.closest_point(p))
            .min_by(|a, b| p.distance(*a).total_cmp(&p.distance(*b)))
            .unwrap_or(p)
    }

    #[inline]
    pub fn distance_to_boundary(&self, p: Point) -> f64 {
        p.distance(self.closest_boundary_point(p))
    }

    /// `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    /// `true` if no two edges meet except consecutive edges at their shared
    /// corner, and no corner folds back onto its incoming edge.
    pub fn is_simple(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        // Spikes: consecutive edges that run back over each other.
        for k in 0..n {
            let v = self.points[k];
            let u = self.points[(k + n - 1) % n] - v;
            let w = self.points[(k + 1) % n] - v;
            if u.cross(w).abs() <= EPS && u.dot(w) > 0.0 {
                return false;
            }
        }

        let edges: Vec<Segment> = self.edges().collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if !adjacent && edges[i].intersects(&edges[j]) {
                    return false;
                }
            }
        }
        true
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Polygon::new(points)
    }
}
