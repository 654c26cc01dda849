mod angles;

pub use angles::{ANGLE_TOL, angle_to_2pi, angle_to_pi, angles_equivalent};
