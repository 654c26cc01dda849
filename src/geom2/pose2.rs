//! The planar pose of a sensor, and the pure functions for moving points between the sensor frame
//! and the world frame.

use crate::common::{angle_to_pi, angles_equivalent};
use crate::geom2::{Iso2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A sensor's position and heading in world coordinates. The heading is in radians and is not
/// normalized; anything which consumes it treats it modulo 2pi.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose2 {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns the heading re-expressed in (-pi, pi]
    pub fn heading(&self) -> f64 {
        angle_to_pi(self.theta)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }

    /// Returns the isometry which takes points from the sensor frame into the world frame
    pub fn iso(&self) -> Iso2 {
        Iso2::new(Vector2::new(self.x, self.y), self.theta)
    }

    /// Returns true if both poses are at the same position and facing the same direction, with
    /// headings compared modulo 2pi.
    pub fn same_as(&self, other: &Pose2) -> bool {
        self.x == other.x && self.y == other.y && angles_equivalent(self.theta, other.theta)
    }
}

/// Rotates a point about the origin by `angle` radians, counter-clockwise.
///
/// # Examples
///
/// ```
/// use scangeom::geom2::rotate_point;
/// use scangeom::Point2;
/// use approx::assert_relative_eq;
/// let p = rotate_point(&Point2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
/// assert_relative_eq!(p, Point2::new(0.0, 1.0), epsilon = 1.0e-12);
/// ```
pub fn rotate_point(point: &Point2, angle: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    Point2::new(c * point.x - s * point.y, s * point.x + c * point.y)
}

/// Takes a point expressed in the sensor frame of `pose` and returns it in world coordinates.
///
/// # Arguments
///
/// * `local`: a point relative to the sensor, with +x along the sensor heading
/// * `pose`: the pose of the sensor in the world
///
/// returns: OPoint<f64, Const<2>>
pub fn to_world(local: &Point2, pose: &Pose2) -> Point2 {
    let rotated = rotate_point(local, pose.theta);
    Point2::new(rotated.x + pose.x, rotated.y + pose.y)
}
