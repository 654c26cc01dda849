use crate::geom2::{Aabb2, Point2, Segment2};

/// Even-odd crossing test for whether `point` lies inside the closed loop formed by `edges`. The
/// edges may be in any order and direction; only the number of them crossed by a ray from
/// `point` towards +x matters. Points exactly on an edge may be reported either way.
///
/// # Examples
///
/// ```
/// use itertools::Itertools;
/// use scangeom::geom2::point_in_polygon;
/// use scangeom::{Point2, Segment2};
/// let square: Vec<Segment2> = [
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ]
/// .iter()
/// .circular_tuple_windows()
/// .map(|(a, b)| Segment2::new(*a, *b))
/// .collect();
/// assert!(point_in_polygon(&Point2::new(0.5, 0.5), &square));
/// assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &square));
/// ```
pub fn point_in_polygon(point: &Point2, edges: &[Segment2]) -> bool {
    edges
        .iter()
        .filter(|e| (e.a.y > point.y) != (e.b.y > point.y))
        .filter(|e| {
            let cross_x = (e.b.x - e.a.x) * (point.y - e.a.y) / (e.b.y - e.a.y) + e.a.x;
            point.x < cross_x
        })
        .count()
        % 2
        == 1
}

/// Returns the axis aligned bounding box of a set of vertices, or `None` if there are no vertices.
pub fn polygon_aabb(vertices: &[Point2]) -> Option<Aabb2> {
    let first = vertices.first()?;
    let (mins, maxs) = vertices
        .iter()
        .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
    Some(Aabb2::new(mins, maxs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use test_case::test_case;

    fn l_shape() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 4.0),
            Point2::new(0.0, 4.0),
        ]
    }

    fn loop_edges(vertices: &[Point2]) -> Vec<Segment2> {
        vertices
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| Segment2::new(*a, *b))
            .collect()
    }

    #[test_case(0.5, 0.5, true)]
    #[test_case(3.5, 0.5, true)]
    #[test_case(0.5, 3.5, true)]
    #[test_case(2.0, 2.0, false ; "in the notch")]
    #[test_case(-1.0, 0.5, false)]
    #[test_case(5.0, 0.5, false)]
    fn test_point_in_l_shape(x: f64, y: f64, expected: bool) {
        let edges = loop_edges(&l_shape());
        assert_eq!(point_in_polygon(&Point2::new(x, y), &edges), expected);
    }

    #[test]
    fn edge_order_does_not_matter() {
        let mut edges = loop_edges(&l_shape());
        edges.reverse();
        edges.swap(0, 3);
        let flipped: Vec<Segment2> = edges.iter().map(|e| Segment2::new(e.b, e.a)).collect();
        assert!(point_in_polygon(&Point2::new(0.5, 3.5), &flipped));
        assert!(!point_in_polygon(&Point2::new(2.0, 2.0), &flipped));
    }

    #[test]
    fn no_edges() {
        assert!(!point_in_polygon(&Point2::new(0.5, 0.5), &[]));
    }

    #[test]
    fn aabb_of_l_shape() {
        let aabb = polygon_aabb(&l_shape()).unwrap();
        assert_eq!(aabb.mins, Point2::new(0.0, 0.0));
        assert_eq!(aabb.maxs, Point2::new(4.0, 4.0));
        assert!(polygon_aabb(&[]).is_none());
    }
}
