//! This module contains common constructs for working with angles. Sensor headings are never
//! forcibly normalized, so anything comparing or reporting headings goes through these helpers
//! and treats angles modulo 2pi.

use std::f64::consts::PI;

pub const ANGLE_TOL: f64 = 1.0e-12;

/// Re-expresses an angle, specified in radians, in the range [0, 2pi).  If the angle was already
/// in the range [0, 2pi), it is returned unchanged.
///
/// # Arguments
///
/// * `angle`: The angle to re-express, in radians
///
/// returns: f64
///
/// # Examples
///
/// ```
/// use scangeom::common::angle_to_2pi;
/// use std::f64::consts::PI;
/// use approx::assert_relative_eq;
/// let new_angle = angle_to_2pi(-PI);
/// assert_relative_eq!(new_angle, PI, epsilon = 1.0e-10);
/// ```
pub fn angle_to_2pi(angle: f64) -> f64 {
    let mut angle = angle % (2.0 * PI);
    if angle < 0.0 {
        angle += 2.0 * PI;
    }

    // A tiny negative remainder can round up to exactly 2pi
    if angle >= 2.0 * PI { 0.0 } else { angle }
}

/// Re-expresses an angle, specified in radians, in the range (-pi, pi].
///
/// # Examples
///
/// ```
/// use scangeom::common::angle_to_pi;
/// use std::f64::consts::PI;
/// use approx::assert_relative_eq;
/// assert_relative_eq!(angle_to_pi(1.5 * PI), -0.5 * PI, epsilon = 1.0e-10);
/// ```
pub fn angle_to_pi(angle: f64) -> f64 {
    let angle = angle_to_2pi(angle);
    if angle > PI { angle - 2.0 * PI } else { angle }
}

/// Returns true if two angles describe the same direction, within `ANGLE_TOL`, regardless of how
/// many full turns separate them.
pub fn angles_equivalent(a: f64, b: f64) -> bool {
    angle_to_pi(a - b).abs() <= ANGLE_TOL * (1.0 + a.abs().max(b.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    #[test_case(0.0, 0.0)]
    #[test_case(-90.0, 270.0)]
    #[test_case(360.0, 0.0)]
    #[test_case(450.0, 90.0)]
    #[test_case(-720.0, 0.0)]
    fn test_angle_to_2pi(angle: f64, expected: f64) {
        let test = angle_to_2pi(angle.to_radians());
        assert_relative_eq!(test, expected.to_radians(), epsilon = 1.0e-10);
    }

    #[test_case(180.0, 180.0)]
    #[test_case(-180.0, 180.0)]
    #[test_case(270.0, -90.0)]
    #[test_case(-271.0, 89.0)]
    #[test_case(725.0, 5.0)]
    fn test_angle_to_pi(angle: f64, expected: f64) {
        let test = angle_to_pi(angle.to_radians());
        assert_relative_eq!(test, expected.to_radians(), epsilon = 1.0e-10);
    }

    #[test]
    fn test_wrapped_ranges() {
        let mut rnd = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let angle = rnd.random_range(-20.0 * PI..20.0 * PI);
            let a2 = angle_to_2pi(angle);
            let a1 = angle_to_pi(angle);
            assert!((0.0..2.0 * PI).contains(&a2), "angle={angle} a2={a2}");
            assert!(a1 > -PI - 1.0e-12 && a1 <= PI + 1.0e-12, "angle={angle} a1={a1}");
            assert_relative_eq!(a1.cos(), angle.cos(), epsilon = 1.0e-9);
            assert_relative_eq!(a1.sin(), angle.sin(), epsilon = 1.0e-9);
        }
    }

    #[test]
    fn test_equivalent_across_turns() {
        assert!(angles_equivalent(0.25, 0.25 + 4.0 * PI));
        assert!(angles_equivalent(-PI, PI));
        assert!(!angles_equivalent(0.25, 0.26));
    }
}
