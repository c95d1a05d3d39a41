//! Flattening of curved path segments into polylines.
//!
//! Curves are approximated within a chord-error tolerance. Segment
//! endpoints are always emitted exactly, so joins between consecutive
//! segments never drift.

use crate::geom::{Point, Transform};
use crate::path::{Arc, PathSegment};

/// Maximum permitted deviation of a flattened chord from its curve, in
/// path units.
pub(crate) const DEFAULT_FLATNESS: f32 = 0.25;

/// Bounds recursion for pathological control polygons; 2^16 chords is far
/// beyond what the flatness test ever asks for on finite input.
const MAX_SUBDIVISION_DEPTH: u32 = 16;

const MAX_ARC_STEPS: u32 = 4096;

/// Appends the segment's polyline to `out`, including its starting point.
pub(crate) fn flatten_segment_into(segment: &PathSegment, tolerance: f32, out: &mut Vec<Point>) {
    match segment {
        PathSegment::Linear(points) => out.extend_from_slice(points),
        PathSegment::QuadraticBezier { from, ctrl, to } => {
            // Raise to a cubic: the curve is unchanged.
            let ctrl1 = from.affine(*ctrl, 2.0 / 3.0);
            let ctrl2 = to.affine(*ctrl, 2.0 / 3.0);
            flatten_cubic_into(*from, ctrl1, ctrl2, *to, tolerance, out);
        }
        PathSegment::CubicBezier {
            from,
            ctrl1,
            ctrl2,
            to,
        } => flatten_cubic_into(*from, *ctrl1, *ctrl2, *to, tolerance, out),
        PathSegment::EllipticalArc(arc) => flatten_arc_into(arc, tolerance, out),
    }
}

pub(crate) fn flatten_cubic_into(
    p0: Point,
    ctrl1: Point,
    ctrl2: Point,
    p3: Point,
    tolerance: f32,
    out: &mut Vec<Point>,
) {
    out.push(p0);
    subdivide_cubic(
        p0,
        ctrl1,
        ctrl2,
        p3,
        tolerance * tolerance,
        MAX_SUBDIVISION_DEPTH,
        out,
    );
}

/// A cubic is flat enough once both control points sit within the
/// tolerance of where they would lie if the curve were its own chord.
fn cubic_is_flat(p0: Point, ctrl1: Point, ctrl2: Point, p3: Point, tolerance_sq: f32) -> bool {
    let d1 = (ctrl1 - p0.affine(p3, 1.0 / 3.0)).length_squared();
    let d2 = (ctrl2 - p0.affine(p3, 2.0 / 3.0)).length_squared();
    d1.max(d2) <= tolerance_sq
}

fn subdivide_cubic(
    p0: Point,
    ctrl1: Point,
    ctrl2: Point,
    p3: Point,
    tolerance_sq: f32,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth == 0 || cubic_is_flat(p0, ctrl1, ctrl2, p3, tolerance_sq) {
        out.push(p3);
        return;
    }
    // De Casteljau split at t = 1/2; the midpoint is shared by the halves.
    let ab = p0.affine(ctrl1, 0.5);
    let bc = ctrl1.affine(ctrl2, 0.5);
    let cd = ctrl2.affine(p3, 0.5);
    let abc = ab.affine(bc, 0.5);
    let bcd = bc.affine(cd, 0.5);
    let mid = abc.affine(bcd, 0.5);
    subdivide_cubic(p0, ab, abc, mid, tolerance_sq, depth - 1, out);
    subdivide_cubic(mid, bcd, cd, p3, tolerance_sq, depth - 1, out);
}

pub(crate) fn flatten_arc_into(arc: &Arc, tolerance: f32, out: &mut Vec<Point>) {
    let rx = arc.radius_x.abs();
    let ry = arc.radius_y.abs();
    let max_radius = rx.max(ry);

    // Sagitta bound: stepping by theta keeps the chord error under the
    // tolerance when r * (1 - cos(theta / 2)) <= tolerance.
    let step = if max_radius <= tolerance {
        std::f32::consts::FRAC_PI_2
    } else {
        2.0 * (1.0 - tolerance / max_radius).acos()
    };

    let start = arc.start_deg.to_radians();
    let sweep = arc.sweep_deg.to_radians();
    let steps = if step > 0.0 {
        ((sweep.abs() / step).ceil() as u32).clamp(1, MAX_ARC_STEPS)
    } else {
        MAX_ARC_STEPS
    };

    let placement = Transform::rotation_deg(arc.rotation_deg)
        .then(&Transform::translation(arc.center.x, arc.center.y))
        .then(&arc.transform);

    for i in 0..=steps {
        // t = 1 lands on the far endpoint exactly.
        let t = i as f32 / steps as f32;
        let theta = start + sweep * t;
        let local = Point::new(rx * theta.cos(), ry * theta.sin());
        out.push(placement.apply(local));
    }
}
