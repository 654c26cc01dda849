//! The static description of a scanning range finder, with the same fields as a ROS
//! `sensor_msgs/LaserScan` header.

use crate::errors::ScanConfigError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The largest number of beams a single sweep may have.
pub const MAX_BEAMS: usize = 1 << 20;

/// Immutable configuration of a simulated scanner. All angles are in radians relative to the
/// sensor heading, and all ranges are in map units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Angle of the first (rightmost) beam
    pub angle_min: f64,

    /// Angle at or before which the last (leftmost) beam lies
    pub angle_max: f64,

    /// Angular spacing between consecutive beams
    pub angle_increment: f64,

    /// Returns closer than this are not reported
    pub range_min: f64,

    /// The furthest the sensor can see, and the value reported for beams without a valid return
    pub range_max: f64,

    /// An opaque label for the sensor frame, passed through without interpretation
    #[serde(default)]
    pub frame_id: String,
}

impl ScanConfig {
    /// Create a validated scan configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use scangeom::ScanConfig;
    /// let config = ScanConfig::new(-0.1, 0.1, 0.1, 0.0, 20.0, "laser").unwrap();
    /// assert_eq!(config.frame_id, "laser");
    /// assert!(ScanConfig::new(0.1, -0.1, 0.1, 0.0, 20.0, "laser").is_err());
    /// ```
    pub fn new(
        angle_min: f64,
        angle_max: f64,
        angle_increment: f64,
        range_min: f64,
        range_max: f64,
        frame_id: impl Into<String>,
    ) -> Result<Self, ScanConfigError> {
        let config = Self {
            angle_min,
            angle_max,
            angle_increment,
            range_min,
            range_max,
            frame_id: frame_id.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every invariant of the configuration, returning the first violation found.
    pub fn validate(&self) -> Result<(), ScanConfigError> {
        let fields = [
            ("angle_min", self.angle_min),
            ("angle_max", self.angle_max),
            ("angle_increment", self.angle_increment),
            ("range_min", self.range_min),
            ("range_max", self.range_max),
        ];
        if let Some(&(name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScanConfigError::NonFinite(name));
        }

        if self.angle_min >= self.angle_max {
            return Err(ScanConfigError::AngleOrder {
                min: self.angle_min,
                max: self.angle_max,
            });
        }

        if self.angle_increment <= 0.0 {
            return Err(ScanConfigError::NonPositiveIncrement(self.angle_increment));
        }

        if self.angle_increment > self.span() {
            return Err(ScanConfigError::IncrementExceedsSpan {
                increment: self.angle_increment,
                span: self.span(),
            });
        }

        let steps = self.span() / self.angle_increment;
        if !(steps.is_finite() && steps < (MAX_BEAMS - 1) as f64) {
            return Err(ScanConfigError::TooManyBeams {
                steps,
                limit: MAX_BEAMS,
            });
        }

        if self.range_min < 0.0 {
            return Err(ScanConfigError::NegativeRangeMin(self.range_min));
        }

        if self.range_max <= self.range_min {
            return Err(ScanConfigError::RangeOrder {
                min: self.range_min,
                max: self.range_max,
            });
        }

        if self.angle_min >= 0.0 || self.angle_max <= 0.0 {
            warn!(
                angle_min = self.angle_min,
                angle_max = self.angle_max,
                frame_id = self.frame_id.as_str(),
                "scan window does not straddle the sensor heading"
            );
        }

        Ok(())
    }

    /// The angular width of the scan window
    pub fn span(&self) -> f64 {
        self.angle_max - self.angle_min
    }

    /// The range value reported for a beam without a valid return
    pub fn sentinel(&self) -> f64 {
        self.range_max
    }

    /// Returns true if `range` is a measurement the sensor would report as a return
    pub fn in_range(&self, range: f64) -> bool {
        range >= self.range_min && range <= self.range_max
    }
}
