//! This module contains tools for simulating a planar scanning range finder: its configuration,
//! the beam set it sweeps, the ray casting engine, and the scan state updated on every tick.

mod beam_set;
mod laser_scan;
mod laser_scanner;
mod ray_cast;
mod scan_config;

pub use beam_set::{BeamSet, beam_count};
pub use laser_scan::ScanState;
pub use laser_scanner::LaserScanner;
pub use ray_cast::{BeamReturn, CastMode, ScanBuffers, cast, cast_beam, cast_into};
pub use scan_config::{MAX_BEAMS, ScanConfig};
