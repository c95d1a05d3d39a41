#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod active;
mod edge;
mod fill;
mod flatten;
mod geom;
mod multipolygon;
mod path;
mod scanner;

pub use geom::{Point, Transform, Vector};
pub use multipolygon::{Multipolygon, Ring};
pub use path::{Arc, Figure, Path, PathBuilder, PathSegment};
pub use scanner::PolygonScanner;

use serde::{Deserialize, Serialize};

/// A fill rule tells us how to decide whether a point is "inside" a path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FillRule {
    /// The point is "inside" if a ray from it crosses the boundary an odd
    /// number of times.
    EvenOdd,
    /// The point is "inside" if the signed sum of boundary crossings along
    /// a ray is non-zero.
    NonZero,
}

/// How authored contour orientations are treated when a path is grouped
/// into a multipolygon.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum OrientationHandling {
    /// The first ring is forced counter-clockwise (an outer contour) and
    /// every following ring clockwise (a hole), regardless of how they
    /// were authored.
    #[default]
    FirstRingIsContourFollowedByHoles,
    /// Ring orientations are preserved exactly as authored.
    KeepOriginal,
}

/// The scan could not be set up.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Error {
    /// At least one of the path's coordinates was not a number.
    NaN,
    /// At least one of the path's coordinates was infinite.
    Infinity,
    /// The subsampling factor must be at least 1.
    InvalidSubsampling(i32),
    /// The scan range was empty (`min_y >= max_y`).
    EmptyScanRange {
        /// The requested first pixel row.
        min_y: i32,
        /// The requested last pixel row.
        max_y: i32,
    },
    /// Scratch memory for the sweep could not be reserved.
    Allocation,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NaN => write!(f, "path contains a NaN coordinate"),
            Error::Infinity => write!(f, "path contains an infinite coordinate"),
            Error::InvalidSubsampling(s) => {
                write!(f, "subsampling factor must be at least 1, got {}", s)
            }
            Error::EmptyScanRange { min_y, max_y } => {
                write!(f, "empty scan range: min_y {} >= max_y {}", min_y, max_y)
            }
            Error::Allocation => write!(f, "could not reserve scan scratch memory"),
        }
    }
}

impl std::error::Error for Error {}

/// Scans `path` over the pixel rows `min_y..=max_y` and collects the
/// crossings of every subpixel scan line, top to bottom.
///
/// This is a convenience wrapper around [`PolygonScanner`] for callers
/// that want the whole result at once; renderers integrating coverage
/// line by line should drive the scanner directly and avoid the
/// per-line allocations made here.
pub fn scan_crossings(
    path: &Path,
    min_y: i32,
    max_y: i32,
    subsampling: i32,
    rule: FillRule,
    orientation: OrientationHandling,
) -> Result<Vec<Vec<f32>>, Error> {
    let mut scanner = PolygonScanner::new(path, min_y, max_y, subsampling, rule, orientation)?;
    let mut lines = Vec::new();
    while scanner.move_to_next_pixel_line() {
        while scanner.move_to_next_subpixel_scan_line() {
            lines.push(scanner.scan_current_line().to_vec());
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_spans_match_both_rules() {
        let mut builder = PathBuilder::new();
        builder.add_lines(&[
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(0.0, 3.0),
        ]);
        builder.close_figure();
        let path = builder.build();

        for rule in [FillRule::EvenOdd, FillRule::NonZero] {
            let lines =
                scan_crossings(&path, 0, 3, 1, rule, OrientationHandling::default()).unwrap();
            assert_eq!(lines.len(), 4);
            assert_eq!(lines[1], vec![0.0, 3.0]);
            assert_eq!(lines[2], vec![0.0, 3.0]);
        }
    }
}
