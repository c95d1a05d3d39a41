//! Grouping a path's flattened contours into oriented vertex rings.
//!
//! A ring's signed area decides whether it is an outer contour or a hole:
//! positive area is counter-clockwise in y-down space (an outer contour),
//! negative is a hole. The orientation policy can rewrite authored
//! orientations into the outer-then-holes convention.

use serde::Serialize;

use crate::flatten::{flatten_segment_into, DEFAULT_FLATNESS};
use crate::geom::Point;
use crate::path::Path;
use crate::OrientationHandling;

/// A closed cycle of vertices, the atomic unit of a [`Multipolygon`].
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Clone, Debug, Serialize)]
pub struct Ring {
    points: Vec<Point>,
    area: f32,
}

impl Ring {
    /// Builds a ring from a flattened contour, dropping consecutive
    /// duplicate vertices and the duplicated closing vertex if present.
    /// Returns `None` for degenerate input (fewer than 3 vertices).
    fn from_points(mut points: Vec<Point>) -> Option<Ring> {
        points.dedup();
        while points.len() > 1 && points.last() == points.first() {
            points.pop();
        }
        if points.len() < 3 {
            return None;
        }
        let area = signed_area(&points);
        Some(Ring { points, area })
    }

    /// The ring's vertices, in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The shoelace area; positive means counter-clockwise in y-down space.
    pub fn signed_area(&self) -> f32 {
        self.area
    }

    /// The number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    fn reverse(&mut self) {
        self.points.reverse();
        self.area = -self.area;
    }
}

/// The shoelace formula over an implicitly closed vertex cycle.
pub(crate) fn signed_area(points: &[Point]) -> f32 {
    let mut doubled = 0.0f32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        doubled += a.x * b.y - b.x * a.y;
    }
    doubled * 0.5
}

/// The flattened, oriented form of a path: a sequence of rings.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Multipolygon {
    rings: Vec<Ring>,
}

impl Multipolygon {
    /// Flattens every closed figure of `path` into a ring and applies the
    /// orientation policy. Open figures exist for stroking and are ignored
    /// here; degenerate contours are silently dropped.
    pub fn from_path(path: &Path, orientation: OrientationHandling) -> Self {
        let mut rings = Vec::new();
        for figure in path.figures() {
            if !figure.is_closed() {
                continue;
            }
            let mut points = Vec::new();
            for segment in figure.segments() {
                flatten_segment_into(segment, DEFAULT_FLATNESS, &mut points);
            }
            if let Some(ring) = Ring::from_points(points) {
                rings.push(ring);
            }
        }

        if orientation == OrientationHandling::FirstRingIsContourFollowedByHoles {
            for (i, ring) in rings.iter_mut().enumerate() {
                // Zero-area rings (self-intersecting figures like an
                // hourglass) keep their authored direction.
                if i == 0 && ring.area < 0.0 {
                    ring.reverse();
                } else if i > 0 && ring.area > 0.0 {
                    ring.reverse();
                }
            }
        }

        Multipolygon { rings }
    }

    /// The rings, outer contour first under the default orientation policy.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Sum of all rings' vertex counts. Bounds the number of crossings any
    /// single scan line can produce at twice this value.
    pub fn total_vertex_count(&self) -> usize {
        self.rings.iter().map(Ring::vertex_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Figure, PathSegment};

    fn closed_polygon(points: &[(f32, f32)]) -> Path {
        let points: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Path::from_figures([Figure::new(vec![PathSegment::Linear(points)], true)])
    }

    #[test]
    fn square_area_is_positive_when_counter_clockwise_in_y_down() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert_eq!(signed_area(&points), 4.0);
        let reversed: Vec<Point> = points.iter().rev().copied().collect();
        assert_eq!(signed_area(&reversed), -4.0);
    }

    #[test]
    fn default_policy_orients_outer_positive_and_holes_negative() {
        let outer = [(0.0, 0.0), (0.0, 6.0), (6.0, 6.0), (6.0, 0.0)]; // authored negative
        let hole = [(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]; // authored positive
        let path = Path::from_figures([
            closed_polygon(&outer).figures()[0].clone(),
            closed_polygon(&hole).figures()[0].clone(),
        ]);
        let poly = Multipolygon::from_path(
            &path,
            OrientationHandling::FirstRingIsContourFollowedByHoles,
        );
        assert_eq!(poly.rings().len(), 2);
        assert!(poly.rings()[0].signed_area() > 0.0);
        assert!(poly.rings()[1].signed_area() < 0.0);
    }

    #[test]
    fn keep_original_preserves_authored_orientation() {
        let path = closed_polygon(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let poly = Multipolygon::from_path(&path, OrientationHandling::KeepOriginal);
        assert!(poly.rings()[0].signed_area() < 0.0);
    }

    #[test]
    fn degenerate_and_open_figures_produce_no_rings() {
        let two_points = closed_polygon(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(Multipolygon::from_path(&two_points, OrientationHandling::KeepOriginal)
            .rings()
            .is_empty());

        let open = Path::from_figures([Figure::new(
            vec![PathSegment::Linear(vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ])],
            false,
        )]);
        assert!(Multipolygon::from_path(&open, OrientationHandling::KeepOriginal)
            .rings()
            .is_empty());
    }

    #[test]
    fn zero_area_hourglass_ring_is_kept() {
        let path = closed_polygon(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        let poly = Multipolygon::from_path(
            &path,
            OrientationHandling::FirstRingIsContourFollowedByHoles,
        );
        assert_eq!(poly.rings().len(), 1);
        assert_eq!(poly.rings()[0].signed_area(), 0.0);
        assert_eq!(poly.total_vertex_count(), 4);
    }

    #[test]
    fn duplicate_and_closing_vertices_are_dropped() {
        let path = closed_polygon(&[
            (0.0, 0.0),
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 3.0),
            (0.0, 0.0),
        ]);
        let poly = Multipolygon::from_path(&path, OrientationHandling::KeepOriginal);
        assert_eq!(poly.rings()[0].vertex_count(), 3);
    }
}
