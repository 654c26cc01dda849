//! The environment a simulated scanner operates in: a set of obstacles, optionally enclosed by a
//! boundary, answering "how far along this ray is the nearest obstacle?"

mod obstacle;

use crate::errors::InvalidGeometry;
use crate::geom2::{Point2, Segment2, Vector2};

pub use obstacle::{Obstacle, ObstacleShape};

/// Anything a beam can be cast against.
///
/// Implementations must return the smallest distance `d` with `0 <= d <= max_distance` at which a
/// ray from `origin` along `direction` meets an obstacle, measured in world units (so the
/// magnitude of `direction` does not matter), or `None` if nothing lies within `max_distance`.
/// Implementations are free to use any acceleration structure internally as long as the answer is
/// the same as testing every edge.
pub trait RayQuery {
    fn nearest_hit(&self, origin: &Point2, direction: &Vector2, max_distance: f64) -> Option<f64>;
}

impl RayQuery for [Segment2] {
    fn nearest_hit(&self, origin: &Point2, direction: &Vector2, max_distance: f64) -> Option<f64> {
        self.iter()
            .filter_map(|e| e.ray_intersection(origin, direction))
            .map(|(d, _)| d)
            .filter(|d| *d <= max_distance)
            .min_by(f64::total_cmp)
    }
}

impl RayQuery for Vec<Segment2> {
    fn nearest_hit(&self, origin: &Point2, direction: &Vector2, max_distance: f64) -> Option<f64> {
        self.as_slice().nearest_hit(origin, direction, max_distance)
    }
}

/// A map made of an optional boundary and any number of obstacles, each identified by an id.
///
/// Obstacles can be registered, removed or swapped out wholesale between scans to simulate moving
/// entities. A scan borrows the map immutably for the whole sweep, so it always sees one
/// consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    boundary: Option<Obstacle>,
    obstacles: Vec<Obstacle>,
}

impl ObstacleMap {
    /// Create an empty map with no boundary and no obstacles. Every ray cast against it misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map from raw coordinates: a boundary loop, plus a list of solid polygons which are
    /// assigned ids by their position in the list and names of the form `obstacle_{id}`.
    ///
    /// # Arguments
    ///
    /// * `boundary`: the vertices of the map boundary, which is treated as a closed ring of walls
    /// * `obstacles`: the vertices of each polygonal obstacle
    ///
    /// returns: Result<ObstacleMap, InvalidGeometry>
    ///
    /// # Examples
    ///
    /// ```
    /// use scangeom::{ObstacleMap, Point2};
    /// let boundary = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(10.0, 0.0),
    ///     Point2::new(10.0, 10.0),
    ///     Point2::new(0.0, 10.0),
    /// ];
    /// let block = vec![Point2::new(4.0, 4.0), Point2::new(6.0, 4.0), Point2::new(6.0, 6.0)];
    /// let map = ObstacleMap::from_raw(boundary, vec![block]).unwrap();
    /// assert_eq!(map.obstacles().count(), 1);
    /// assert_eq!(map.edge_count(), 7);
    /// ```
    pub fn from_raw(
        boundary: Vec<Point2>,
        obstacles: Vec<Vec<Point2>>,
    ) -> Result<Self, InvalidGeometry> {
        let mut map = Self::new().with_boundary(boundary)?;
        for (i, vertices) in obstacles.into_iter().enumerate() {
            map.register_obstacle(Obstacle::polygon(i, vertices)?);
        }
        Ok(map)
    }

    pub fn with_boundary(mut self, vertices: Vec<Point2>) -> Result<Self, InvalidGeometry> {
        self.set_boundary(vertices)?;
        Ok(self)
    }

    pub fn set_boundary(&mut self, vertices: Vec<Point2>) -> Result<(), InvalidGeometry> {
        self.boundary = Some(Obstacle::new(
            usize::MAX,
            "boundary",
            ObstacleShape::Ring,
            vertices,
        )?);
        Ok(())
    }

    pub fn boundary(&self) -> Option<&Obstacle> {
        self.boundary.as_ref()
    }

    /// Adds an obstacle to the map. If an obstacle with the same id already exists it is replaced
    /// in place and returned.
    pub fn register_obstacle(&mut self, obstacle: Obstacle) -> Option<Obstacle> {
        match self.obstacles.iter_mut().find(|o| o.id() == obstacle.id()) {
            Some(existing) => Some(std::mem::replace(existing, obstacle)),
            None => {
                self.obstacles.push(obstacle);
                None
            }
        }
    }

    pub fn remove_obstacle(&mut self, id: usize) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id() == id)?;
        Some(self.obstacles.remove(index))
    }

    /// Swaps the entire obstacle set for a new one, leaving the boundary in place. This is the
    /// way to move dynamic obstacles between scans.
    pub fn replace_obstacles<I>(&mut self, obstacles: I)
    where
        I: IntoIterator<Item = Obstacle>,
    {
        let mut next = ObstacleMap::new();
        for obstacle in obstacles {
            next.register_obstacle(obstacle);
        }
        self.obstacles = next.obstacles;
    }

    pub fn obstacle(&self, id: usize) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id() == id)
    }

    /// Iterates over the obstacles, not including the boundary, in registration order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    fn all(&self) -> impl Iterator<Item = &Obstacle> {
        self.boundary.iter().chain(self.obstacles.iter())
    }

    /// The total number of non-degenerate edges a ray may be tested against, boundary included
    pub fn edge_count(&self) -> usize {
        self.all().map(|o| o.edges().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Returns true if the point lies inside the map boundary. A map without a boundary, or whose
    /// boundary has a gap from non-finite vertices, is unbounded and contains every point.
    pub fn contains(&self, point: &Point2) -> bool {
        self.boundary
            .as_ref()
            .filter(|b| b.is_sealed())
            .is_none_or(|b| b.encloses(point))
    }

    /// Returns the extents of the boundary as `(x_min, x_max, y_min, y_max)`
    pub fn boundary_scope(&self) -> Option<(f64, f64, f64, f64)> {
        let aabb = self.boundary.as_ref()?.aabb()?;
        Some((aabb.mins.x, aabb.maxs.x, aabb.mins.y, aabb.maxs.y))
    }

    /// Passes every vertex of the boundary and of every obstacle through `f`, for instance to
    /// move the map into a different coordinate frame.
    ///
    /// If any shape can no longer be built from its mapped vertices the error is returned and the
    /// map is left unchanged.
    pub fn map_coords<F>(&mut self, f: F) -> Result<(), InvalidGeometry>
    where
        F: Fn(&Point2) -> Point2,
    {
        let boundary = self.boundary.as_ref().map(|b| b.mapped(&f)).transpose()?;
        let obstacles = self
            .obstacles
            .iter()
            .map(|o| o.mapped(&f))
            .collect::<Result<Vec<_>, _>>()?;

        self.boundary = boundary;
        self.obstacles = obstacles;
        Ok(())
    }

    /// Uniformly scales every coordinate in the map about the origin
    pub fn rescale(&mut self, factor: f64) -> Result<(), InvalidGeometry> {
        self.map_coords(|p| Point2::from(p.coords * factor))
    }
}

impl RayQuery for ObstacleMap {
    fn nearest_hit(&self, origin: &Point2, direction: &Vector2, max_distance: f64) -> Option<f64> {
        self.all()
            .filter_map(|o| o.nearest_hit(origin, direction, max_distance))
            .min_by(f64::total_cmp)
    }
}
