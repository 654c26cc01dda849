//! A single obstacle, normalized once into an edge list and a bounding box so that ray queries
//! never need to care what kind of shape they are looking at.

use crate::errors::InvalidGeometry;
use crate::geom2::{
    Aabb2, INTERSECT_EPS, Point2, Ray2, Segment2, Vector2, point_in_polygon, polygon_aabb,
};
use crate::map2::RayQuery;
use itertools::Itertools;
use parry2d_f64::bounding_volume::BoundingVolume;
use parry2d_f64::query::RayCast;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The kinds of geometry an obstacle can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// A closed, solid polygon. A sensor inside it sees the obstacle at zero distance on every
    /// beam.
    Polygon,

    /// A closed loop of walls with nothing solid inside, such as the outer boundary of a map.
    Ring,

    /// An open chain of line segments.
    Chain,
}

impl ObstacleShape {
    pub fn is_closed(&self) -> bool {
        !matches!(self, ObstacleShape::Chain)
    }

    fn min_vertices(&self) -> usize {
        if self.is_closed() { 3 } else { 2 }
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    id: usize,
    name: String,
    shape: ObstacleShape,
    vertices: Vec<Point2>,
    edges: Vec<Segment2>,
    aabb: Option<Aabb2>,
    sealed: bool,
}

impl Obstacle {
    /// Create a new obstacle from its vertices. For closed shapes the vertices describe the loop
    /// without repeating the first vertex at the end; a repeated closing vertex is removed.
    ///
    /// Zero-length and non-finite edges are dropped here, so they can never produce a hit. A
    /// closed shape which loses an edge to a non-finite vertex is left with a gap in its loop and
    /// is no longer sealed: it still blocks beams with its remaining edges, but encloses nothing.
    ///
    /// # Arguments
    ///
    /// * `id`: the identifier of the obstacle within its map
    /// * `name`: a human-readable label, carried through untouched
    /// * `shape`: whether the vertices form a solid polygon, a hollow ring or an open chain
    /// * `vertices`: the vertices in world coordinates
    ///
    /// returns: Result<Obstacle, InvalidGeometry>
    pub fn new(
        id: usize,
        name: impl Into<String>,
        shape: ObstacleShape,
        vertices: Vec<Point2>,
    ) -> Result<Self, InvalidGeometry> {
        let mut vertices = vertices;
        if shape.is_closed() && vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let required = shape.min_vertices();
        if vertices.len() < required {
            return Err(InvalidGeometry::NotEnoughVertices {
                required,
                found: vertices.len(),
            });
        }

        let name = name.into();
        let candidates: Vec<Segment2> = if shape.is_closed() {
            vertices
                .iter()
                .circular_tuple_windows()
                .map(|(a, b)| Segment2::new(*a, *b))
                .collect()
        } else {
            vertices
                .iter()
                .tuple_windows()
                .map(|(a, b)| Segment2::new(*a, *b))
                .collect()
        };

        let total = candidates.len();
        let broken = candidates.iter().any(|e| !e.is_finite());
        let edges: Vec<Segment2> = candidates
            .into_iter()
            .filter(|e| !e.is_degenerate())
            .collect();
        if edges.len() < total {
            debug!(
                id,
                name = name.as_str(),
                dropped = total - edges.len(),
                broken,
                "skipping degenerate obstacle edges"
            );
        }

        let finite: Vec<Point2> = edges.iter().flat_map(|e| [e.a, e.b]).collect();
        let aabb = polygon_aabb(&finite);

        Ok(Self {
            id,
            name,
            shape,
            vertices,
            edges,
            aabb,
            sealed: shape.is_closed() && !broken,
        })
    }

    pub fn polygon(id: usize, vertices: Vec<Point2>) -> Result<Self, InvalidGeometry> {
        Self::new(id, format!("obstacle_{id}"), ObstacleShape::Polygon, vertices)
    }

    pub fn chain(id: usize, vertices: Vec<Point2>) -> Result<Self, InvalidGeometry> {
        Self::new(id, format!("obstacle_{id}"), ObstacleShape::Chain, vertices)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ObstacleShape {
        self.shape
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// The edges which can actually be hit, with degenerate edges already removed
    pub fn edges(&self) -> &[Segment2] {
        &self.edges
    }

    pub fn aabb(&self) -> Option<&Aabb2> {
        self.aabb.as_ref()
    }

    /// True for a closed shape whose edge loop has no gaps
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns true if the point lies inside the loop of edges of a sealed, closed shape. This is
    /// tested against the same edges that beams are cast against.
    pub fn encloses(&self, point: &Point2) -> bool {
        self.sealed && point_in_polygon(point, &self.edges)
    }

    /// Returns true if the point is strictly enclosed by a solid polygon obstacle. Rings and
    /// chains never contain anything.
    pub fn contains(&self, point: &Point2) -> bool {
        self.shape == ObstacleShape::Polygon && self.encloses(point)
    }

    /// Returns a copy of this obstacle with every vertex passed through `f`, rebuilding the edge
    /// list and bounding box. Fails if the mapping collapses a closed shape's closing vertex onto
    /// its first and leaves too few vertices behind.
    pub fn mapped<F>(&self, f: F) -> Result<Self, InvalidGeometry>
    where
        F: Fn(&Point2) -> Point2,
    {
        let vertices = self.vertices.iter().map(f).collect();
        Self::new(self.id, self.name.clone(), self.shape, vertices)
    }

    /// Cheap rejection test: can a ray from `origin` along the unit `dir` reach this obstacle's
    /// bounding box within `max_distance`?
    fn may_hit(&self, origin: &Point2, dir: &Vector2, max_distance: f64) -> bool {
        let Some(aabb) = &self.aabb else {
            return false;
        };
        let margin = INTERSECT_EPS * (1.0 + aabb.extents().norm() + origin.coords.norm());
        let ray = Ray2::new(*origin, *dir);
        aabb.loosened(margin)
            .intersects_local_ray(&ray, max_distance + margin)
    }
}

impl RayQuery for Obstacle {
    fn nearest_hit(&self, origin: &Point2, direction: &Vector2, max_distance: f64) -> Option<f64> {
        let len = direction.norm();
        if !(len.is_finite() && len > 0.0) || max_distance < 0.0 {
            return None;
        }

        if !self.may_hit(origin, &(direction / len), max_distance) {
            return None;
        }

        if self.contains(origin) {
            return Some(0.0);
        }

        self.edges.nearest_hit(origin, direction, max_distance)
    }
}
