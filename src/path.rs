use serde::{Deserialize, Serialize};

use crate::geom::{Point, Transform};
use crate::Error;

/// One segment of a figure.
///
/// Curved variants are flattened to polylines before scanning; the tagged
/// representation keeps dispatch out of the scanner's inner loops.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PathSegment {
    /// A polyline through the given points (at least two).
    Linear(Vec<Point>),
    /// A quadratic Bézier curve.
    QuadraticBezier {
        /// The starting point.
        from: Point,
        /// The control point.
        ctrl: Point,
        /// The ending point.
        to: Point,
    },
    /// A cubic Bézier curve.
    CubicBezier {
        /// The starting point.
        from: Point,
        /// The first control point.
        ctrl1: Point,
        /// The second control point.
        ctrl2: Point,
        /// The ending point.
        to: Point,
    },
    /// An elliptical arc.
    EllipticalArc(Arc),
}

/// An elliptical arc segment, described in its own ellipse space and carried
/// together with the transform that places it on the path.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Arc {
    /// The ellipse center, before `transform`.
    pub center: Point,
    /// The semi-axis along the (unrotated) x direction.
    pub radius_x: f32,
    /// The semi-axis along the (unrotated) y direction.
    pub radius_y: f32,
    /// Rotation of the ellipse axes, in degrees.
    pub rotation_deg: f32,
    /// The starting angle, in degrees, measured in ellipse space.
    pub start_deg: f32,
    /// The swept angle, in degrees; negative sweeps run backwards.
    pub sweep_deg: f32,
    /// Applied to every evaluated point, after rotation and centering.
    pub transform: Transform,
}

impl PathSegment {
    pub(crate) fn each_coordinate(&self, f: &mut impl FnMut(f32)) {
        match self {
            PathSegment::Linear(points) => {
                for p in points {
                    f(p.x);
                    f(p.y);
                }
            }
            PathSegment::QuadraticBezier { from, ctrl, to } => {
                for p in [from, ctrl, to] {
                    f(p.x);
                    f(p.y);
                }
            }
            PathSegment::CubicBezier {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                for p in [from, ctrl1, ctrl2, to] {
                    f(p.x);
                    f(p.y);
                }
            }
            PathSegment::EllipticalArc(arc) => {
                f(arc.center.x);
                f(arc.center.y);
                f(arc.radius_x);
                f(arc.radius_y);
                f(arc.rotation_deg);
                f(arc.start_deg);
                f(arc.sweep_deg);
                let t = &arc.transform;
                for v in [t.m11, t.m12, t.m21, t.m22, t.m31, t.m32] {
                    f(v);
                }
            }
        }
    }
}

/// An ordered run of segments, optionally closed.
///
/// Closed figures are implicitly closed at ring construction (the last
/// vertex is joined to the first); open figures are ignored by the fill
/// scanner.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Figure {
    segments: Vec<PathSegment>,
    closed: bool,
}

impl Figure {
    /// Creates a figure from its segments.
    pub fn new(segments: Vec<PathSegment>, closed: bool) -> Self {
        Figure { segments, closed }
    }

    /// The figure's segments, in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether the figure is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// A figure is empty iff it has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A set of figures. This is the input to [`PolygonScanner`](crate::PolygonScanner).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Path {
    figures: Vec<Figure>,
}

impl Path {
    /// Creates a path from figures, stripping empty ones.
    pub fn from_figures(figures: impl IntoIterator<Item = Figure>) -> Self {
        Path {
            figures: figures.into_iter().filter(|f| !f.is_empty()).collect(),
        }
    }

    /// The path's figures.
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// Rejects paths containing NaN or infinite coordinates, NaN first
    /// (a NaN anywhere makes the infinity question moot).
    pub(crate) fn check_finite(&self) -> Result<(), Error> {
        let mut nan = false;
        let mut infinite = false;
        for figure in &self.figures {
            for segment in &figure.segments {
                segment.each_coordinate(&mut |v| {
                    nan |= v.is_nan();
                    infinite |= v.is_infinite();
                });
            }
        }
        if nan {
            Err(Error::NaN)
        } else if infinite {
            Err(Error::Infinity)
        } else {
            Ok(())
        }
    }
}

/// Incrementally assembles a [`Path`].
///
/// The active transform (and origin translation) is applied to geometry as
/// it is added; changing the transform afterwards does not disturb segments
/// already recorded.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    figures: Vec<Figure>,
    current: Vec<PathSegment>,
    transform: Transform,
    origin: Point,
}

impl PathBuilder {
    /// Creates an empty builder with the identity transform.
    pub fn new() -> Self {
        PathBuilder {
            figures: Vec::new(),
            current: Vec::new(),
            transform: Transform::IDENTITY,
            origin: Point::new(0.0, 0.0),
        }
    }

    fn effective_transform(&self) -> Transform {
        self.transform
            .then(&Transform::translation(self.origin.x, self.origin.y))
    }

    fn place(&self, p: Point) -> Point {
        self.effective_transform().apply(p)
    }

    /// Sets the transform applied to subsequently added geometry.
    pub fn set_transform(&mut self, transform: Transform) -> &mut Self {
        self.transform = transform;
        self
    }

    /// Restores the identity transform.
    pub fn reset_transform(&mut self) -> &mut Self {
        self.transform = Transform::IDENTITY;
        self
    }

    /// Sets a translation applied after the transform.
    pub fn set_origin(&mut self, origin: Point) -> &mut Self {
        self.origin = origin;
        self
    }

    /// Restores the zero origin.
    pub fn reset_origin(&mut self) -> &mut Self {
        self.origin = Point::new(0.0, 0.0);
        self
    }

    /// Finishes the current figure (open) and starts a new one.
    pub fn start_figure(&mut self) -> &mut Self {
        self.flush_current(false);
        self
    }

    /// Closes the current figure and starts a new one.
    pub fn close_figure(&mut self) -> &mut Self {
        self.flush_current(true);
        self
    }

    /// Closes every figure recorded so far, including the current one.
    pub fn close_all_figures(&mut self) -> &mut Self {
        self.flush_current(true);
        for figure in &mut self.figures {
            figure.closed = true;
        }
        self
    }

    /// Adds a line between two points.
    pub fn add_line(&mut self, from: Point, to: Point) -> &mut Self {
        self.current
            .push(PathSegment::Linear(vec![self.place(from), self.place(to)]));
        self
    }

    /// Adds a polyline through the given points.
    pub fn add_lines(&mut self, points: &[Point]) -> &mut Self {
        if points.len() >= 2 {
            self.current.push(PathSegment::Linear(
                points.iter().map(|&p| self.place(p)).collect(),
            ));
        }
        self
    }

    /// Adds a quadratic Bézier curve.
    pub fn add_quadratic_bezier(&mut self, from: Point, ctrl: Point, to: Point) -> &mut Self {
        self.current.push(PathSegment::QuadraticBezier {
            from: self.place(from),
            ctrl: self.place(ctrl),
            to: self.place(to),
        });
        self
    }

    /// Adds a cubic Bézier curve.
    pub fn add_cubic_bezier(
        &mut self,
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    ) -> &mut Self {
        self.current.push(PathSegment::CubicBezier {
            from: self.place(from),
            ctrl1: self.place(ctrl1),
            ctrl2: self.place(ctrl2),
            to: self.place(to),
        });
        self
    }

    /// Adds an elliptical arc. Angles are in degrees; the arc is evaluated
    /// in ellipse space and placed with the builder's active transform.
    #[allow(clippy::too_many_arguments)]
    pub fn add_elliptical_arc(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        rotation_deg: f32,
        start_deg: f32,
        sweep_deg: f32,
    ) -> &mut Self {
        self.current.push(PathSegment::EllipticalArc(Arc {
            center,
            radius_x,
            radius_y,
            rotation_deg,
            start_deg,
            sweep_deg,
            transform: self.effective_transform(),
        }));
        self
    }

    /// Removes all recorded figures, keeping the transform and origin.
    pub fn clear(&mut self) -> &mut Self {
        self.figures.clear();
        self.current.clear();
        self
    }

    /// Removes all recorded figures and restores the default transform and
    /// origin.
    pub fn reset(&mut self) -> &mut Self {
        self.clear();
        self.transform = Transform::IDENTITY;
        self.origin = Point::new(0.0, 0.0);
        self
    }

    /// Builds the path. The builder keeps its figures, so `build` can be
    /// called again after adding more geometry.
    pub fn build(&mut self) -> Path {
        self.flush_current(false);
        Path::from_figures(self.figures.iter().cloned())
    }

    fn flush_current(&mut self, closed: bool) {
        if !self.current.is_empty() {
            self.figures.push(Figure {
                segments: std::mem::take(&mut self.current),
                closed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_figures_are_stripped() {
        let path = Path::from_figures([
            Figure::default(),
            Figure::new(
                vec![PathSegment::Linear(vec![
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 0.0),
                ])],
                true,
            ),
        ]);
        assert_eq!(path.figures().len(), 1);
    }

    #[test]
    fn nan_is_reported_before_infinity() {
        let mut builder = PathBuilder::new();
        builder.add_lines(&[
            Point::new(0.0, f32::INFINITY),
            Point::new(f32::NAN, 1.0),
            Point::new(1.0, 1.0),
        ]);
        builder.close_figure();
        assert_eq!(builder.build().check_finite(), Err(Error::NaN));
    }

    #[test]
    fn builder_transform_applies_to_added_lines() {
        let mut builder = PathBuilder::new();
        builder.set_transform(Transform::translation(10.0, 0.0));
        builder.add_line(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        builder.reset_transform();
        builder.add_line(Point::new(3.0, 4.0), Point::new(1.0, 2.0));
        builder.close_figure();
        let path = builder.build();
        let segments = path.figures()[0].segments();
        match (&segments[0], &segments[1]) {
            (PathSegment::Linear(a), PathSegment::Linear(b)) => {
                assert_eq!(a[0], Point::new(11.0, 2.0));
                assert_eq!(b[1], Point::new(1.0, 2.0));
            }
            other => panic!("unexpected segments: {:?}", other),
        }
    }

    #[test]
    fn close_all_figures_closes_earlier_open_figures() {
        let mut builder = PathBuilder::new();
        builder.add_line(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        builder.start_figure();
        builder.add_line(Point::new(2.0, 0.0), Point::new(3.0, 0.0));
        builder.close_all_figures();
        let path = builder.build();
        assert!(path.figures().iter().all(Figure::is_closed));
    }
}
