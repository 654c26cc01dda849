//! Line segments and the exact ray/segment intersection used by the ray caster.

use crate::geom2::{Aabb2, Point2, Vector2, cross2};
use serde::{Deserialize, Serialize};

/// Numerical tolerance for the ray/segment determinant test. A ray and a segment are considered
/// parallel when the magnitude of the cross product of their directions is at most this fraction
/// of the product of their lengths (i.e. the sine of the angle between them is below 1e-9). The
/// same value is used as the slack on the segment parameter so that a ray through a shared vertex
/// registers on at least one of the two edges.
pub const INTERSECT_EPS: f64 = 1.0e-9;

/// A straight line segment between two points, used as the edge representation of every obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub a: Point2,
    pub b: Point2,
}

impl Segment2 {
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    pub fn dir(&self) -> Vector2 {
        self.b - self.a
    }

    pub fn length(&self) -> f64 {
        self.dir().norm()
    }

    pub fn is_finite(&self) -> bool {
        self.a.iter().chain(self.b.iter()).all(|v| v.is_finite())
    }

    /// Returns true if the segment cannot block a ray: either end point is not finite or the two
    /// end points coincide.
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.length() <= f64::EPSILON * (1.0 + self.a.coords.amax())
    }

    pub fn aabb(&self) -> Aabb2 {
        Aabb2::new(self.a.inf(&self.b), self.a.sup(&self.b))
    }

    /// Returns the distance and point at which a ray starting at `origin` and travelling along
    /// `direction` crosses this segment, if it does.
    pub fn ray_intersection(&self, origin: &Point2, direction: &Vector2) -> Option<(f64, Point2)> {
        segment_intersection(origin, direction, &self.a, &self.b)
    }
}

/// Intersects a ray with the segment between `a` and `b` by solving the two line parameter
/// equations directly with 2x2 determinants.
///
/// The ray is `origin + t * direction` for `t >= 0` and the segment is `a + u * (b - a)` for
/// `u` in `[0, 1]` (with `INTERSECT_EPS` of slack). The returned distance is `t * |direction|`,
/// so `direction` does not need to be normalized.
///
/// Returns `None` when the ray and segment are parallel (including collinear overlap), when the
/// intersection is behind the ray origin or off the end of the segment, and when either the ray
/// or the segment is degenerate (zero length or non-finite).
///
/// # Examples
///
/// ```
/// use scangeom::geom2::segment_intersection;
/// use scangeom::{Point2, Vector2};
/// use approx::assert_relative_eq;
/// let hit = segment_intersection(
///     &Point2::origin(),
///     &Vector2::new(1.0, 0.0),
///     &Point2::new(5.0, -10.0),
///     &Point2::new(5.0, 10.0),
/// );
/// let (d, p) = hit.unwrap();
/// assert_relative_eq!(d, 5.0);
/// assert_relative_eq!(p, Point2::new(5.0, 0.0));
/// ```
pub fn segment_intersection(
    origin: &Point2,
    direction: &Vector2,
    a: &Point2,
    b: &Point2,
) -> Option<(f64, Point2)> {
    let e = b - a;
    let d_len = direction.norm();
    let e_len = e.norm();
    if !(d_len.is_finite() && e_len.is_finite()) || d_len == 0.0 || e_len == 0.0 {
        return None;
    }

    let denom = cross2(direction, &e);
    if denom.abs() <= INTERSECT_EPS * d_len * e_len {
        return None;
    }

    let w = a - origin;
    let t = cross2(&w, &e) / denom;
    let u = cross2(&w, direction) / denom;

    if t < 0.0 || u < -INTERSECT_EPS || u > 1.0 + INTERSECT_EPS {
        return None;
    }

    Some((t * d_len, origin + direction * t))
}
