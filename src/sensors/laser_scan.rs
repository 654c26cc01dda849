//! The scan state of a simulated scanner: its fixed configuration and beam set, plus the result of
//! the most recent sweep, updated in place on every tick.

use crate::errors::{ScanConfigError, ScanError};
use crate::geom2::{Point2, Pose2, Segment2};
use crate::map2::RayQuery;
use crate::sensors::{BeamReturn, BeamSet, CastMode, ScanBuffers, ScanConfig, cast_into};
use tracing::debug;

/// The output of a scanner, similar in content to a ROS `sensor_msgs/LaserScan` message.
///
/// A `ScanState` is built once from a [`ScanConfig`] and then updated in place. The beam angles
/// never change after construction, and `ranges`, `beam_end_points` and `returns` always have one
/// entry per beam. An update writes a complete sweep into internal scratch storage and then swaps
/// it in, so a reader never sees a mix of two sweeps and no storage is reallocated between ticks.
#[derive(Debug, Clone)]
pub struct ScanState {
    config: ScanConfig,
    beams: BeamSet,
    state: Pose2,
    timestamp: f64,
    mode: CastMode,
    current: ScanBuffers,
    scratch: ScanBuffers,
}

impl ScanState {
    /// Create a new scan state, generating the beam set and allocating zeroed ranges and end
    /// points for every beam.
    ///
    /// # Arguments
    ///
    /// * `config`: the scanner configuration, which must be valid
    ///
    /// returns: Result<ScanState, ScanConfigError>
    ///
    /// # Examples
    ///
    /// ```
    /// use scangeom::{ScanConfig, ScanState};
    /// let config = ScanConfig::new(-0.1, 0.1, 0.1, 0.0, 20.0, "laser").unwrap();
    /// let scan = ScanState::from_config(config).unwrap();
    /// assert_eq!(scan.angles().len(), 3);
    /// assert_eq!(scan.ranges(), &[0.0, 0.0, 0.0]);
    /// ```
    pub fn from_config(config: ScanConfig) -> Result<Self, ScanConfigError> {
        let beams = BeamSet::generate(&config)?;
        let n = beams.len();
        Ok(Self {
            config,
            beams,
            state: Pose2::default(),
            timestamp: 0.0,
            mode: CastMode::default(),
            current: ScanBuffers::new(n),
            scratch: ScanBuffers::new(n),
        })
    }

    /// Selects how future updates cast their beams. The results do not depend on the mode.
    pub fn with_cast_mode(mut self, mode: CastMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_cast_mode(&mut self, mode: CastMode) {
        self.mode = mode;
    }

    /// Places the sensor at `pose` with nothing in view: every beam reports the sentinel range
    /// and an end point at `range_max` along the beam.
    pub fn init_beams(&mut self, pose: Pose2) -> Result<(), ScanError> {
        let nothing: &[Segment2] = &[];
        self.update_ranges_and_beams(pose, nothing)
    }

    /// Re-casts every beam from `pose` against `map` and replaces the stored pose, ranges, end
    /// points and returns together.
    ///
    /// If the pose is not finite an error is returned and the previous sweep is left exactly as
    /// it was. Otherwise the update always completes. The map is borrowed for the whole sweep, so
    /// it cannot change part way through.
    ///
    /// # Examples
    ///
    /// ```
    /// use scangeom::{Point2, Pose2, ScanConfig, ScanState, Segment2};
    /// use approx::assert_relative_eq;
    /// let config = ScanConfig::new(-0.1, 0.1, 0.1, 0.0, 20.0, "laser").unwrap();
    /// let mut scan = ScanState::from_config(config).unwrap();
    /// let wall = vec![Segment2::new(Point2::new(5.0, -10.0), Point2::new(5.0, 10.0))];
    ///
    /// scan.update_ranges_and_beams(Pose2::new(1.0, 0.0, 0.0), &wall).unwrap();
    /// assert_relative_eq!(scan.ranges()[1], 4.0, epsilon = 1.0e-9);
    /// ```
    pub fn update_ranges_and_beams<M>(&mut self, pose: Pose2, map: &M) -> Result<(), ScanError>
    where
        M: RayQuery + Sync + ?Sized,
    {
        if !pose.is_finite() {
            return Err(ScanError::InvalidPose {
                x: pose.x,
                y: pose.y,
                theta: pose.theta,
            });
        }

        cast_into(
            &pose,
            &self.beams,
            map,
            &self.config,
            self.mode,
            &mut self.scratch,
        );
        std::mem::swap(&mut self.current, &mut self.scratch);
        self.state = pose;

        debug!(
            frame_id = self.config.frame_id.as_str(),
            beams = self.len(),
            hits = self.hit_count(),
            "scan updated"
        );

        Ok(())
    }

    pub fn set_timestamp(&mut self, timestamp: f64) {
        self.timestamp = timestamp;
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn frame_id(&self) -> &str {
        &self.config.frame_id
    }

    pub fn beams(&self) -> &BeamSet {
        &self.beams
    }

    /// The beam angles in radians relative to the sensor heading, from rightmost to leftmost
    pub fn angles(&self) -> &[f64] {
        self.beams.angles()
    }

    /// The beam angles in degrees, derived from `angles`
    pub fn angles_deg(&self) -> Vec<f64> {
        self.beams.angles_deg()
    }

    /// The pose of the sensor when the current sweep was captured
    pub fn state(&self) -> Pose2 {
        self.state
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn cast_mode(&self) -> CastMode {
        self.mode
    }

    pub fn ranges(&self) -> &[f64] {
        &self.current.ranges
    }

    pub fn beam_end_points(&self) -> &[Point2] {
        &self.current.end_points
    }

    /// What each beam saw, distinguishing real returns from the sentinel range reported for
    /// misses and for obstacles closer than `range_min`
    pub fn returns(&self) -> &[BeamReturn] {
        &self.current.returns
    }

    pub fn len(&self) -> usize {
        self.beams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    pub fn hit_count(&self) -> usize {
        self.current.returns.iter().filter(|r| r.is_hit()).count()
    }

    /// Iterates over `(angle, range, end point)` for each beam, in beam order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, &Point2)> {
        self.beams
            .iter()
            .zip(self.current.ranges.iter().copied())
            .zip(self.current.end_points.iter())
            .map(|((a, r), p)| (a, r, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map2::ObstacleMap;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn wall() -> Vec<Segment2> {
        vec![Segment2::new(Point2::new(5.0, -10.0), Point2::new(5.0, 10.0))]
    }

    fn small() -> ScanState {
        let config = ScanConfig::new(-0.1, 0.1, 0.1, 0.0, 20.0, "laser").unwrap();
        ScanState::from_config(config).unwrap()
    }

    fn assert_aligned(scan: &ScanState) {
        assert_eq!(scan.ranges().len(), scan.angles().len());
        assert_eq!(scan.beam_end_points().len(), scan.angles().len());
        assert_eq!(scan.returns().len(), scan.angles().len());
    }

    #[test]
    fn construction_is_zeroed() {
        let scan = small();
        assert_aligned(&scan);
        assert!(scan.ranges().iter().all(|r| *r == 0.0));
        assert!(scan.beam_end_points().iter().all(|p| *p == Point2::origin()));
        assert_eq!(scan.hit_count(), 0);
        assert_eq!(scan.frame_id(), "laser");
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = ScanConfig {
            angle_min: -0.1,
            angle_max: 0.1,
            angle_increment: 0.1,
            range_min: 5.0,
            range_max: 1.0,
            frame_id: String::new(),
        };
        assert_eq!(
            ScanState::from_config(config).unwrap_err(),
            ScanConfigError::RangeOrder { min: 5.0, max: 1.0 }
        );
    }

    #[test]
    fn init_beams_reaches_range_max() {
        let mut scan = small();
        scan.init_beams(Pose2::new(1.0, 1.0, PI / 4.0)).unwrap();
        assert_aligned(&scan);
        assert_eq!(scan.state(), Pose2::new(1.0, 1.0, PI / 4.0));
        for (a, r, p) in scan.iter() {
            assert_eq!(r, 20.0);
            let expected = Point2::new(
                1.0 + 20.0 * (PI / 4.0 + a).cos(),
                1.0 + 20.0 * (PI / 4.0 + a).sin(),
            );
            assert_relative_eq!(*p, expected, epsilon = 1.0e-9);
        }
        assert!(scan.returns().iter().all(|r| *r == BeamReturn::NoHit));
    }

    #[test]
    fn known_wall() {
        let mut scan = small();
        scan.init_beams(Pose2::default()).unwrap();
        scan.update_ranges_and_beams(Pose2::default(), &wall()).unwrap();
        assert_relative_eq!(scan.angles()[0], -0.1, epsilon = 1.0e-12);
        assert_relative_eq!(scan.angles()[1], 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(scan.angles()[2], 0.1, epsilon = 1.0e-12);
        assert_relative_eq!(scan.ranges()[1], 5.0, epsilon = 1.0e-9);
        assert_relative_eq!(scan.beam_end_points()[1], Point2::new(5.0, 0.0), epsilon = 1.0e-9);
        assert_eq!(scan.hit_count(), 3);

        scan.update_ranges_and_beams(Pose2::new(1.0, 0.0, 0.0), &wall()).unwrap();
        assert_relative_eq!(scan.ranges()[1], 4.0, epsilon = 1.0e-9);
        assert_eq!(scan.state(), Pose2::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn repeated_updates_are_idempotent() {
        let mut scan = small();
        let map = ObstacleMap::from_raw(
            vec![
                Point2::new(-3.0, -3.0),
                Point2::new(6.0, -3.0),
                Point2::new(6.0, 4.0),
                Point2::new(-3.0, 4.0),
            ],
            vec![vec![
                Point2::new(2.0, -0.5),
                Point2::new(3.0, -0.5),
                Point2::new(3.0, 0.5),
            ]],
        )
        .unwrap();
        let pose = Pose2::new(0.5, 0.2, 0.05);

        scan.update_ranges_and_beams(pose, &map).unwrap();
        let ranges = scan.ranges().to_vec();
        let ends = scan.beam_end_points().to_vec();

        scan.update_ranges_and_beams(pose, &map).unwrap();
        assert_eq!(scan.ranges(), ranges.as_slice());
        assert_eq!(scan.beam_end_points(), ends.as_slice());
    }

    #[test]
    fn invalid_pose_keeps_previous_sweep() {
        let mut scan = small();
        scan.update_ranges_and_beams(Pose2::default(), &wall()).unwrap();
        let ranges = scan.ranges().to_vec();
        let ends = scan.beam_end_points().to_vec();

        let result = scan.update_ranges_and_beams(Pose2::new(f64::NAN, 0.0, 0.0), &wall());
        assert!(matches!(result, Err(ScanError::InvalidPose { .. })));
        assert_eq!(scan.ranges(), ranges.as_slice());
        assert_eq!(scan.beam_end_points(), ends.as_slice());
        assert_eq!(scan.state(), Pose2::default());
    }

    #[test]
    fn storage_is_reused_between_ticks() {
        let mut scan = small();
        let beams = scan.beams().clone();
        scan.init_beams(Pose2::default()).unwrap();
        let first = scan.ranges().as_ptr();
        scan.update_ranges_and_beams(Pose2::default(), &wall()).unwrap();
        let second = scan.ranges().as_ptr();

        for i in 0..10 {
            let pose = Pose2::new(i as f64 * 0.1, 0.0, 0.0);
            scan.update_ranges_and_beams(pose, &wall()).unwrap();
            let p = scan.ranges().as_ptr();
            assert!(p == first || p == second);
            assert_aligned(&scan);
        }
        assert!(scan.beams().shares_storage_with(&beams));
    }

    #[test]
    fn parallel_mode_gives_same_sweep() {
        let config = ScanConfig::new(-PI, PI, PI / 180.0, 0.0, 20.0, "laser").unwrap();
        let mut serial = ScanState::from_config(config.clone()).unwrap();
        let mut parallel = ScanState::from_config(config)
            .unwrap()
            .with_cast_mode(CastMode::Parallel);
        let pose = Pose2::new(0.0, 1.0, -0.3);

        serial.update_ranges_and_beams(pose, &wall()).unwrap();
        parallel.update_ranges_and_beams(pose, &wall()).unwrap();
        assert_eq!(serial.ranges(), parallel.ranges());
        assert_eq!(serial.beam_end_points(), parallel.beam_end_points());
        assert_eq!(serial.returns(), parallel.returns());
    }

    #[test]
    fn degrees_match_radians() {
        let scan = small();
        let deg = scan.angles_deg();
        for (d, r) in deg.iter().zip(scan.angles()) {
            assert_eq!(*d, r * 180.0 / PI);
        }
    }
}
