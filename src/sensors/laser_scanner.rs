//! A convenience wrapper which owns a scanner's configuration, the map it operates in, and its
//! scan state, and produces one timestamped sweep per call.

use crate::errors::{ScanConfigError, ScanError};
use crate::geom2::{Point2, Pose2};
use crate::io::load_scan_config;
use crate::map2::ObstacleMap;
use crate::sensors::{CastMode, ScanConfig, ScanState};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct LaserScanner {
    map: Option<ObstacleMap>,
    scan: ScanState,
    loaded: bool,
}

impl LaserScanner {
    /// Create a scanner from a configuration. The configuration is validated here, so a scanner
    /// which exists can always produce sweeps once it has a map and a starting pose.
    pub fn new(config: ScanConfig) -> Result<Self, ScanConfigError> {
        Ok(Self {
            map: None,
            scan: ScanState::from_config(config)?,
            loaded: false,
        })
    }

    /// Create a scanner from a configuration file, read as YAML for `.yaml`/`.yml` files and as
    /// JSON otherwise.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let config = load_scan_config(path)?;
        Ok(Self::new(config)?)
    }

    pub fn with_cast_mode(mut self, mode: CastMode) -> Self {
        self.scan.set_cast_mode(mode);
        self
    }

    /// Sets the map the scanner operates in, replacing any previously loaded map
    pub fn load_map(&mut self, map: ObstacleMap) {
        self.map = Some(map);
    }

    pub fn map(&self) -> Option<&ObstacleMap> {
        self.map.as_ref()
    }

    /// Mutable access to the loaded map, for moving obstacles between sweeps
    pub fn map_mut(&mut self) -> Option<&mut ObstacleMap> {
        self.map.as_mut()
    }

    /// Places the scanner at its starting pose with every beam at maximum range.
    pub fn load_scanner(&mut self, pose: Pose2) -> Result<(), ScanError> {
        self.scan.init_beams(pose)?;
        self.loaded = true;
        Ok(())
    }

    /// Performs one sweep from `pose` at time `time` and returns the resulting scan.
    ///
    /// If the pose lies outside the map boundary a warning is logged and the sweep reports
    /// nothing in view, with every beam at maximum range.
    ///
    /// # Errors
    ///
    /// * `ScanError::MapNotLoaded` if `load_map` has not been called
    /// * `ScanError::ScannerNotLoaded` if `load_scanner` has not been called
    /// * `ScanError::InvalidPose` if the pose is not finite, in which case the previous sweep is
    ///   kept
    ///
    /// # Examples
    ///
    /// ```
    /// use scangeom::{LaserScanner, ObstacleMap, Point2, Pose2, ScanConfig};
    /// let config = ScanConfig::new(-1.5, 1.5, 0.5, 0.0, 20.0, "laser").unwrap();
    /// let mut scanner = LaserScanner::new(config).unwrap();
    /// let room = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(10.0, 0.0),
    ///     Point2::new(10.0, 10.0),
    ///     Point2::new(0.0, 10.0),
    /// ];
    /// scanner.load_map(ObstacleMap::from_raw(room, Vec::new()).unwrap());
    /// scanner.load_scanner(Pose2::new(1.0, 1.0, 0.0)).unwrap();
    ///
    /// let scan = scanner.scan(0.5, Pose2::new(5.0, 5.0, 0.0)).unwrap();
    /// assert_eq!(scan.hit_count(), scan.len());
    /// assert_eq!(scan.timestamp(), 0.5);
    /// ```
    pub fn scan(&mut self, time: f64, pose: Pose2) -> Result<&ScanState, ScanError> {
        let map = self.map.as_ref().ok_or(ScanError::MapNotLoaded)?;
        if !self.loaded {
            return Err(ScanError::ScannerNotLoaded);
        }

        if pose.is_finite() && !map.contains(&pose.position()) {
            warn!(
                x = pose.x,
                y = pose.y,
                frame_id = self.scan.frame_id(),
                "scanner is outside the map boundary"
            );
            self.scan.init_beams(pose)?;
        } else {
            self.scan.update_ranges_and_beams(pose, map)?;
        }

        self.scan.set_timestamp(time);
        Ok(&self.scan)
    }

    /// The pose of the most recent sweep, or the starting pose if no sweep has run yet
    pub fn state(&self) -> Pose2 {
        self.scan.state()
    }

    pub fn position(&self) -> Point2 {
        self.scan.state().position()
    }

    pub fn heading(&self) -> f64 {
        self.scan.state().theta
    }

    pub fn scan_state(&self) -> &ScanState {
        &self.scan
    }
}
