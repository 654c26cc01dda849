//! The ray casting engine: turns a pose, a beam set and a map into per-beam ranges and end points.

use crate::geom2::{Point2, Pose2, direction};
use crate::map2::RayQuery;
use crate::sensors::{BeamSet, ScanConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// What a single beam saw during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeamReturn {
    /// Nothing within `range_max`. The range is the sentinel and the end point sits at
    /// `range_max` along the beam.
    #[default]
    NoHit,

    /// An obstacle between `range_min` and `range_max` inclusive. The range is the distance to it
    /// and the end point is where the beam met it.
    Hit,

    /// An obstacle closer than `range_min`, which the sensor cannot report. Treated like a miss:
    /// the range is the sentinel and the end point sits at `range_max` along the beam.
    TooClose,
}

impl BeamReturn {
    pub fn is_hit(&self) -> bool {
        matches!(self, BeamReturn::Hit)
    }
}

/// Whether the beams of a sweep are cast one after another on the calling thread, or spread
/// across the rayon thread pool. Both produce identical results in identical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastMode {
    #[default]
    Serial,
    Parallel,
}

/// Index-aligned output storage for one sweep: `ranges[i]`, `end_points[i]` and `returns[i]` all
/// describe beam `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanBuffers {
    pub ranges: Vec<f64>,
    pub end_points: Vec<Point2>,
    pub returns: Vec<BeamReturn>,
}

impl ScanBuffers {
    /// Allocates zeroed storage for `n` beams: zero ranges, end points at the origin, no returns
    pub fn new(n: usize) -> Self {
        Self {
            ranges: vec![0.0; n],
            end_points: vec![Point2::origin(); n],
            returns: vec![BeamReturn::NoHit; n],
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn resize(&mut self, n: usize) {
        self.ranges.resize(n, 0.0);
        self.end_points.resize(n, Point2::origin());
        self.returns.resize(n, BeamReturn::NoHit);
    }
}

/// Casts a single beam from `origin` at the absolute world angle `angle` and classifies what it
/// sees according to the range limits of `config`.
///
/// returns: (range, end point, what the beam saw)
pub fn cast_beam<M>(
    origin: &Point2,
    angle: f64,
    map: &M,
    config: &ScanConfig,
) -> (f64, Point2, BeamReturn)
where
    M: RayQuery + ?Sized,
{
    let dir = direction(angle);
    match map.nearest_hit(origin, &dir, config.range_max) {
        Some(d) if d >= config.range_min => (d, origin + dir * d, BeamReturn::Hit),
        Some(_) => (
            config.sentinel(),
            origin + dir * config.range_max,
            BeamReturn::TooClose,
        ),
        None => (
            config.sentinel(),
            origin + dir * config.range_max,
            BeamReturn::NoHit,
        ),
    }
}

/// Casts every beam in `beams` from `pose` against `map`, returning the ranges and world-space
/// end points in beam order.
///
/// Each beam points along `pose.theta + beams[i]`. Beams without a valid return report
/// `config.range_max` as their range and the point at `range_max` along the beam as their end
/// point. This allocates new output vectors; use [`cast_into`] to reuse storage between sweeps.
///
/// # Examples
///
/// ```
/// use scangeom::sensors::cast;
/// use scangeom::{BeamSet, Point2, Pose2, ScanConfig, Segment2};
/// use approx::assert_relative_eq;
/// let config = ScanConfig::new(-0.1, 0.1, 0.1, 0.0, 20.0, "laser").unwrap();
/// let beams = BeamSet::generate(&config).unwrap();
/// let wall = vec![Segment2::new(Point2::new(5.0, -10.0), Point2::new(5.0, 10.0))];
///
/// let (ranges, ends) = cast(&Pose2::new(0.0, 0.0, 0.0), &beams, &wall, &config);
/// assert_relative_eq!(ranges[1], 5.0, epsilon = 1.0e-9);
/// assert_relative_eq!(ends[1], Point2::new(5.0, 0.0), epsilon = 1.0e-9);
/// ```
pub fn cast<M>(
    pose: &Pose2,
    beams: &BeamSet,
    map: &M,
    config: &ScanConfig,
) -> (Vec<f64>, Vec<Point2>)
where
    M: RayQuery + Sync + ?Sized,
{
    let mut out = ScanBuffers::new(beams.len());
    cast_into(pose, beams, map, config, CastMode::Serial, &mut out);
    (out.ranges, out.end_points)
}

/// Casts every beam in `beams` from `pose` against `map`, overwriting `out` so that entry `i`
/// describes beam `i`. When `out` already holds storage for `beams.len()` beams nothing is
/// allocated.
pub fn cast_into<M>(
    pose: &Pose2,
    beams: &BeamSet,
    map: &M,
    config: &ScanConfig,
    mode: CastMode,
    out: &mut ScanBuffers,
) where
    M: RayQuery + Sync + ?Sized,
{
    out.resize(beams.len());
    let origin = pose.position();

    match mode {
        CastMode::Serial => {
            let slots = out
                .ranges
                .iter_mut()
                .zip(out.end_points.iter_mut())
                .zip(out.returns.iter_mut());
            for (((range, end), status), angle) in slots.zip(beams.iter()) {
                (*range, *end, *status) = cast_beam(&origin, pose.theta + angle, map, config);
            }
        }
        CastMode::Parallel => {
            // Every beam writes only its own slots, so the output order is the beam order no
            // matter how rayon schedules the work
            out.ranges
                .par_iter_mut()
                .zip(out.end_points.par_iter_mut())
                .zip(out.returns.par_iter_mut())
                .zip(beams.angles().par_iter())
                .for_each(|(((range, end), status), angle)| {
                    (*range, *end, *status) =
                        cast_beam(&origin, pose.theta + angle, map, config);
                });
        }
    }
}
