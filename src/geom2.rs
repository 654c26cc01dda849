//! Planar geometry primitives: the nalgebra types used throughout the crate, the sensor pose, and
//! the pure functions needed to intersect beams with obstacle edges.

mod polygon2;
mod pose2;
mod segment2;

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Vector2 = parry2d_f64::na::Vector2<f64>;
pub type Iso2 = parry2d_f64::na::Isometry2<f64>;
pub type Aabb2 = parry2d_f64::bounding_volume::Aabb;
pub type Ray2 = parry2d_f64::query::Ray;

pub use self::polygon2::{point_in_polygon, polygon_aabb};
pub use self::pose2::{Pose2, rotate_point, to_world};
pub use self::segment2::{INTERSECT_EPS, Segment2, segment_intersection};

/// Returns the z component of the cross product of two planar vectors, which is the signed area
/// of the parallelogram they span.
pub fn cross2(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Returns the unit direction vector pointing at `angle` radians from the world x-axis.
pub fn direction(angle: f64) -> Vector2 {
    let (s, c) = angle.sin_cos();
    Vector2::new(c, s)
}
