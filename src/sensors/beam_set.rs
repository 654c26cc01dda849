//! Generation of the fixed, ordered set of beam angles swept by a scanner.

use crate::errors::ScanConfigError;
use crate::sensors::{MAX_BEAMS, ScanConfig};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::trace;

/// Relative slack used when deciding whether the last step of the sweep lands on `angle_max`.
/// Without it, a span which divides evenly in exact arithmetic (like 0.2 / 0.1) could lose its last
/// beam to floating point representation error.
const BEAM_COUNT_TOL: f64 = 1.0e-9;

/// The beam angles of a scanner, in radians relative to the sensor heading, strictly increasing
/// from `angle_min` (index 0, rightmost) towards `angle_max` (leftmost).
///
/// The angles are generated once and are immutable afterward. Cloning a `BeamSet` shares the same
/// storage rather than copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSet {
    angles: Arc<[f64]>,
}

impl BeamSet {
    /// Generate the beam angles for a configuration. The first beam is at `angle_min` and each
    /// following beam is `angle_increment` further along. Beams stop at or before `angle_max`: if
    /// the increment does not divide the span evenly, the partial step at the end is dropped
    /// rather than clipped, so the spacing is always uniform.
    ///
    /// # Arguments
    ///
    /// * `config`: the scan configuration, which is validated first
    ///
    /// returns: Result<BeamSet, ScanConfigError>
    ///
    /// # Examples
    ///
    /// ```
    /// use scangeom::{BeamSet, ScanConfig};
    /// use approx::assert_relative_eq;
    /// let config = ScanConfig::new(-0.1, 0.1, 0.1, 0.0, 20.0, "laser").unwrap();
    /// let beams = BeamSet::generate(&config).unwrap();
    /// assert_eq!(beams.len(), 3);
    /// assert_relative_eq!(beams.angles()[1], 0.0, epsilon = 1.0e-12);
    /// ```
    pub fn generate(config: &ScanConfig) -> Result<Self, ScanConfigError> {
        config.validate()?;

        let count = beam_count(config);
        let angles: Arc<[f64]> = (0..count)
            .map(|i| (config.angle_min + i as f64 * config.angle_increment).min(config.angle_max))
            .collect();

        trace!(
            count,
            first = ?angles.first(),
            last = ?angles.last(),
            "generated beam set"
        );

        Ok(Self { angles })
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// The beam angles converted to degrees. This is computed on demand from the stored radians.
    pub fn angles_deg(&self) -> Vec<f64> {
        self.angles.iter().map(|a| a * 180.0 / PI).collect()
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.angles.get(index).copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.angles.iter().copied()
    }

    /// Returns true if both beam sets are views of the same generated storage
    pub fn shares_storage_with(&self, other: &BeamSet) -> bool {
        Arc::ptr_eq(&self.angles, &other.angles)
    }
}

/// The number of beams a (valid) configuration produces:
/// `floor((angle_max - angle_min) / angle_increment) + 1`, with a small relative tolerance on the
/// division. The result is always between 1 and `MAX_BEAMS`, even for a configuration which
/// would fail validation.
pub fn beam_count(config: &ScanConfig) -> usize {
    let steps = config.span() / config.angle_increment;
    let whole = (steps + BEAM_COUNT_TOL * steps.max(1.0)).floor();
    if !whole.is_finite() || whole < 0.0 {
        return 1;
    }
    (whole as usize).min(MAX_BEAMS - 1).saturating_add(1)
}
