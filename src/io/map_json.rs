//! The JSON map format: a boundary loop plus obstacles, given either as a bare list of vertex lists
//! or as a list of entries carrying an id and an optional name.
//!
//! ```json
//! {
//!     "boundary_coords": [[0, 0], [10, 0], [10, 10], [0, 10]],
//!     "obstacle_dict": [{"id_": 1, "name": "crate", "vertices": [[1, 1], [2, 1], [2, 2]]}]
//! }
//! ```

use crate::map2::{Obstacle, ObstacleMap, ObstacleShape};
use crate::{Point2, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleEntry {
    #[serde(rename = "id_")]
    pub id: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub vertices: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFile {
    pub boundary_coords: Vec<[f64; 2]>,

    /// Obstacles with explicit ids. Takes precedence over `obstacle_list` when both are present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_dict: Option<Vec<ObstacleEntry>>,

    /// Obstacles as bare vertex lists, given ids by their position in the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_list: Option<Vec<Vec<[f64; 2]>>>,
}

impl MapFile {
    /// Returns the obstacle entries in the file, synthesizing ids and names for a bare
    /// `obstacle_list`
    pub fn entries(&self) -> Vec<ObstacleEntry> {
        if let Some(dict) = &self.obstacle_dict {
            return dict.clone();
        }

        self.obstacle_list
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, vertices)| ObstacleEntry {
                id: i,
                name: None,
                vertices: vertices.clone(),
            })
            .collect()
    }

    /// Builds the map, scaling every coordinate by `rescale` if one is given. Every obstacle is a
    /// solid polygon and the boundary is a closed ring of walls.
    pub fn into_map(self, rescale: Option<f64>) -> Result<ObstacleMap> {
        let scale = rescale.unwrap_or(1.0);
        let to_points = |coords: &[[f64; 2]]| -> Vec<Point2> {
            coords
                .iter()
                .map(|c| Point2::new(c[0] * scale, c[1] * scale))
                .collect()
        };

        let mut map = ObstacleMap::new().with_boundary(to_points(&self.boundary_coords))?;
        for entry in self.entries() {
            let name = entry
                .name
                .unwrap_or_else(|| format!("obstacle_{}", entry.id));
            let obstacle = Obstacle::new(
                entry.id,
                name,
                ObstacleShape::Polygon,
                to_points(&entry.vertices),
            )?;
            map.register_obstacle(obstacle);
        }
        Ok(map)
    }
}

/// Parses a map from a JSON string, optionally scaling every coordinate by `rescale`.
///
/// # Examples
///
/// ```
/// use scangeom::io::map_from_str;
/// let map = map_from_str(r#"{
///     "boundary_coords": [[0, 0], [10, 0], [10, 10], [0, 10]],
///     "obstacle_list": [[[1, 1], [2, 1], [2, 2], [1, 2]]]
/// }"#, None).unwrap();
/// assert_eq!(map.obstacle(0).unwrap().name(), "obstacle_0");
/// ```
pub fn map_from_str(json: &str, rescale: Option<f64>) -> Result<ObstacleMap> {
    let file: MapFile = serde_json::from_str(json)?;
    file.into_map(rescale)
}
