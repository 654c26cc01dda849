//! Simulation of a planar scanning range finder (a 2D lidar) operating in a map made of polygons
//! and line segment chains.
//!
//! The sensor's beam angles are generated once from a [`ScanConfig`], and each update casts every
//! beam from the current [`Pose2`] against an [`ObstacleMap`], writing ranges and world-space end
//! points into a [`ScanState`] in place.

use std::error::Error;

pub mod common;
pub mod errors;
pub mod geom2;
pub mod io;
pub mod map2;
pub mod sensors;

pub use parry2d_f64::na;

pub use errors::{InvalidGeometry, ScanConfigError, ScanError};
pub use geom2::{Aabb2, Iso2, Point2, Pose2, Ray2, Segment2, Vector2};
pub use map2::{Obstacle, ObstacleMap, ObstacleShape, RayQuery};
pub use sensors::{BeamReturn, BeamSet, CastMode, LaserScanner, ScanConfig, ScanState};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;
