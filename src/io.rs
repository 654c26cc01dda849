//! This module has I/O functionality for loading scanner configurations (JSON or YAML) and maps
//! (JSON).

mod map_json;

use crate::sensors::ScanConfig;
use crate::{ObstacleMap, Result};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use map_json::{MapFile, ObstacleEntry, map_from_str};

/// Parses and validates a scanner configuration from a JSON string. The recognized fields are
/// `angle_min`, `angle_max`, `angle_increment`, `range_min`, `range_max` and an optional
/// `frame_id`.
///
/// # Examples
///
/// ```
/// use scangeom::io::scan_config_from_str;
/// let config = scan_config_from_str(r#"{
///     "angle_min": -1.57, "angle_max": 1.57, "angle_increment": 0.0174,
///     "range_min": 0.0, "range_max": 10.0, "frame_id": "laser"
/// }"#).unwrap();
/// assert_eq!(config.frame_id, "laser");
/// ```
pub fn scan_config_from_str(json: &str) -> Result<ScanConfig> {
    let config: ScanConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Parses and validates a scanner configuration from a YAML document, with the same fields as
/// [`scan_config_from_str`].
///
/// # Examples
///
/// ```
/// use scangeom::io::scan_config_from_yaml_str;
/// let config = scan_config_from_yaml_str("
/// angle_min: -1.57
/// angle_max: 1.57
/// angle_increment: 0.0174
/// range_min: 0.0
/// range_max: 10
/// ").unwrap();
/// assert_eq!(config.range_max, 10.0);
/// assert_eq!(config.frame_id, "");
/// ```
pub fn scan_config_from_yaml_str(yaml: &str) -> Result<ScanConfig> {
    let config: ScanConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Loads and validates a scanner configuration from a file. Files ending in `.yaml` or `.yml` are
/// read as YAML, anything else as JSON.
pub fn load_scan_config(path: &Path) -> Result<ScanConfig> {
    let reader = BufReader::new(File::open(path)?);
    let config: ScanConfig = match path.extension().and_then(OsStr::to_str) {
        Some("yaml") | Some("yml") => serde_yaml::from_reader(reader)?,
        _ => serde_json::from_reader(reader)?,
    };
    config.validate()?;
    Ok(config)
}

/// Loads a map from a JSON file. See [`map_from_str`] for the format.
pub fn load_map(path: &Path, rescale: Option<f64>) -> Result<ObstacleMap> {
    let reader = BufReader::new(File::open(path)?);
    let file: MapFile = serde_json::from_reader(reader)?;
    file.into_map(rescale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScanConfigError;
    use std::io::Write;

    #[test]
    fn invalid_config_is_rejected_after_parsing() {
        let json = r#"{
            "angle_min": 1.0, "angle_max": -1.0, "angle_increment": 0.1,
            "range_min": 0.0, "range_max": 10.0
        }"#;
        let err = scan_config_from_str(json).unwrap_err();
        let err = err.downcast_ref::<ScanConfigError>().unwrap();
        assert_eq!(*err, ScanConfigError::AngleOrder { min: 1.0, max: -1.0 });
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let json = r#"{ "angle_min": -1.0, "angle_max": 1.0 }"#;
        let err = scan_config_from_str(json).unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn load_config_from_file() {
        let path = std::env::temp_dir().join(format!("scangeom_config_{}.json", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(
            br#"{"angle_min": -0.1, "angle_max": 0.1, "angle_increment": 0.1,
                 "range_min": 0.0, "range_max": 20.0, "frame_id": "base_laser"}"#,
        )
        .unwrap();
        drop(f);

        let config = load_scan_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.frame_id, "base_laser");
        assert_eq!(config.range_max, 20.0);
    }

    #[test]
    fn load_config_from_yaml_file() {
        let path = std::env::temp_dir().join(format!("scangeom_config_{}.yaml", std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(
            b"# dense scanner\n\
              angle_min: -1.5707963267948966\n\
              angle_max: 1.5707963267948966\n\
              angle_increment: 0.017453292519943295\n\
              range_min: 0.0\n\
              range_max: 10\n\
              frame_id: dense_laser\n",
        )
        .unwrap();
        drop(f);

        let config = load_scan_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.frame_id, "dense_laser");
        assert_eq!(config.range_max, 10.0);
        assert_eq!(crate::sensors::beam_count(&config), 181);
    }

    #[test]
    fn invalid_yaml_config_is_rejected_after_parsing() {
        let yaml = "angle_min: -0.5\nangle_max: 0.5\nangle_increment: 0.1\nrange_min: 3.0\nrange_max: 1.0\n";
        let err = scan_config_from_yaml_str(yaml).unwrap_err();
        let err = err.downcast_ref::<ScanConfigError>().unwrap();
        assert_eq!(*err, ScanConfigError::RangeOrder { min: 3.0, max: 1.0 });
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = scan_config_from_yaml_str("angle_min: [1, 2").unwrap_err();
        assert!(err.downcast_ref::<serde_yaml::Error>().is_some());
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/scangeom/map.json");
        assert!(load_map(path, None).is_err());
    }
}
