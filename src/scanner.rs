//! The polygon scanner: a sweep in subpixel y over a compiled path.
//!
//! The scanner is single-owner and purely sequential: one instance per
//! fill operation, driven by two nested pumps. The outer pump advances
//! pixel rows, the inner one advances the subpixel lines within the row;
//! `scan_current_line` then yields the sorted, fill-rule-resolved
//! crossings of the current line. All scratch is reserved at construction;
//! the per-line work never allocates.

use ordered_float::OrderedFloat;

use crate::active::{ActiveEdgeList, Crossing};
use crate::edge::{EdgeIdx, ScanEdgeCollection};
use crate::fill;
use crate::multipolygon::Multipolygon;
use crate::path::Path;
use crate::{Error, FillRule, OrientationHandling};

/// Sweeps a path from `min_y` to `max_y` and reports, for every subpixel
/// scan line, the sorted x coordinates where the path crosses it.
///
/// Drive it in order: [`move_to_next_pixel_line`] until it returns
/// `false`, and within each pixel line [`move_to_next_subpixel_scan_line`]
/// until it returns `false`, calling [`scan_current_line`] for each
/// subpixel line. Calling out of order is a caller bug and is reported by
/// debug assertions rather than errors.
///
/// [`move_to_next_pixel_line`]: PolygonScanner::move_to_next_pixel_line
/// [`move_to_next_subpixel_scan_line`]: PolygonScanner::move_to_next_subpixel_scan_line
/// [`scan_current_line`]: PolygonScanner::scan_current_line
#[derive(Debug)]
pub struct PolygonScanner {
    edges: ScanEdgeCollection,
    sorted_by_y0: Vec<EdgeIdx>,
    sorted_by_y1: Vec<EdgeIdx>,
    active: ActiveEdgeList,
    crossings: Vec<Crossing>,
    line: Vec<f32>,
    rule: FillRule,
    min_y: i32,
    max_y: i32,
    subsampling: i32,
    pixel_y: i32,
    /// Global subpixel counter; the sweep height is `sub_index / subsampling`.
    /// Deriving the height from an integer keeps it on the same grid the
    /// edge endpoints were snapped to, so endpoint comparisons are exact.
    sub_index: i64,
    /// Cursor into `sorted_by_y0`: edges before it have entered.
    idx0: usize,
    /// Cursor into `sorted_by_y1`: edges before it have been marked leaving.
    idx1: usize,
}

impl PolygonScanner {
    /// Compiles `path` and prepares a sweep of the pixel rows
    /// `min_y..=max_y`, with `subsampling` scan lines per row.
    ///
    /// Fails fast on invalid input (non-finite coordinates, `subsampling`
    /// below 1, an empty y range) and on scratch-reservation failure.
    /// Degenerate contours are not an error: a path producing no edges
    /// yields a scanner that reports no crossings on every line.
    pub fn new(
        path: &Path,
        min_y: i32,
        max_y: i32,
        subsampling: i32,
        rule: FillRule,
        orientation: OrientationHandling,
    ) -> Result<Self, Error> {
        if subsampling < 1 {
            return Err(Error::InvalidSubsampling(subsampling));
        }
        if min_y >= max_y {
            return Err(Error::EmptyScanRange { min_y, max_y });
        }
        path.check_finite()?;

        let multipolygon = Multipolygon::from_path(path, orientation);
        let edges = ScanEdgeCollection::from_multipolygon(&multipolygon, subsampling);
        let edge_count = edges.len();
        // Each active edge emits at most two crossings per line.
        let max_crossings = 2 * edge_count;

        let mut sorted_by_y0 = try_reserved(edge_count)?;
        sorted_by_y0.extend((0..edge_count as u32).map(EdgeIdx));
        sorted_by_y0.sort_by_key(|&i| OrderedFloat(edges[i].y0()));

        let mut sorted_by_y1 = try_reserved(edge_count)?;
        sorted_by_y1.extend((0..edge_count as u32).map(EdgeIdx));
        sorted_by_y1.sort_by_key(|&i| OrderedFloat(edges[i].y1()));

        let active = ActiveEdgeList::with_capacity(edge_count)?;
        let crossings = try_reserved(max_crossings)?;
        let line = try_reserved(max_crossings)?;

        let mut scanner = PolygonScanner {
            edges,
            sorted_by_y0,
            sorted_by_y1,
            active,
            crossings,
            line,
            rule,
            min_y,
            max_y,
            subsampling,
            pixel_y: min_y - 1,
            sub_index: min_y as i64 * subsampling as i64 - 1,
            idx0: 0,
            idx1: 0,
        };
        scanner.skip_edges_before_min_y();
        Ok(scanner)
    }

    /// The current pixel row.
    pub fn pixel_line_y(&self) -> i32 {
        self.pixel_y
    }

    /// The current subpixel sweep height.
    pub fn sub_pixel_y(&self) -> f32 {
        self.sub_index as f32 / self.subsampling as f32
    }

    /// The vertical distance between consecutive subpixel scan lines.
    pub fn subpixel_fraction(&self) -> f32 {
        1.0 / self.subsampling as f32
    }

    /// Advances to the next pixel row. Returns `false` once the row range
    /// is exhausted.
    pub fn move_to_next_pixel_line(&mut self) -> bool {
        self.pixel_y += 1;
        self.sub_index = self.pixel_y as i64 * self.subsampling as i64 - 1;
        self.pixel_y <= self.max_y
    }

    /// Advances to the next subpixel scan line within the current pixel
    /// row, updating the active edge list. Returns `false` once the row
    /// (or the overall range) has no further lines; the scanner state is
    /// only advanced when the move succeeds.
    pub fn move_to_next_subpixel_scan_line(&mut self) -> bool {
        debug_assert!(
            self.pixel_y >= self.min_y,
            "call move_to_next_pixel_line before the subpixel pump"
        );
        let subsampling = self.subsampling as i64;
        let next = self.sub_index + 1;
        let within_row = next < (self.pixel_y as i64 + 1) * subsampling;
        let within_range = next <= self.max_y as i64 * subsampling;
        if !(within_row && within_range) {
            return false;
        }
        self.active.compact();
        self.sub_index = next;
        let y = self.sub_pixel_y();
        self.enter_edges(y);
        self.leave_edges(y);
        true
    }

    /// Computes the crossings of the current subpixel scan line: sorted
    /// ascending, fill-rule resolved, always of even length.
    pub fn scan_current_line(&mut self) -> &[f32] {
        debug_assert!(
            self.pixel_y >= self.min_y && self.sub_index >= self.pixel_y as i64 * self.subsampling as i64,
            "advance both pumps before scanning"
        );
        let y = self.sub_pixel_y();
        self.active
            .compute_crossings(y, self.edges.edges(), &mut self.crossings);
        fill::resolve(self.rule, &self.crossings, &mut self.line);
        debug_assert!(self.line.len() % 2 == 0);
        &self.line
    }

    fn enter_edges(&mut self, y: f32) {
        while self.idx0 < self.sorted_by_y0.len() {
            let idx = self.sorted_by_y0[self.idx0];
            if self.edges[idx].y0() > y {
                break;
            }
            self.active.enter(idx);
            self.idx0 += 1;
        }
    }

    fn leave_edges(&mut self, y: f32) {
        while self.idx1 < self.sorted_by_y1.len() {
            let idx = self.sorted_by_y1[self.idx1];
            if self.edges[idx].y1() > y {
                break;
            }
            self.active.leave_mark(idx);
            self.idx1 += 1;
        }
    }

    /// Fast-forwards over every edge event strictly below `min_y`, jumping
    /// from event to event instead of stepping line by line. No output is
    /// produced; the result is an active list (and cursors) as if the
    /// sweep had run from the topmost edge.
    fn skip_edges_before_min_y(&mut self) {
        let min_y = self.min_y as f32;
        let Some(&first) = self.sorted_by_y0.first() else {
            return;
        };
        let mut y = self.edges[first].y0();
        while y < min_y {
            self.active.compact();
            self.enter_edges(y);
            self.leave_edges(y);
            let next_enter = self
                .sorted_by_y0
                .get(self.idx0)
                .map(|&i| self.edges[i].y0());
            let next_leave = self
                .sorted_by_y1
                .get(self.idx1)
                .map(|&i| self.edges[i].y1());
            y = match (next_enter, next_leave) {
                (Some(enter), Some(leave)) => enter.min(leave),
                (Some(enter), None) => enter,
                (None, Some(leave)) => leave,
                (None, None) => break,
            };
        }
        self.active.compact();
    }
}

fn try_reserved<T>(n: usize) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| Error::Allocation)?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::path::PathBuilder;

    fn polygon(points: &[(f32, f32)]) -> Path {
        let points: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let mut builder = PathBuilder::new();
        builder.add_lines(&points);
        builder.close_figure();
        builder.build()
    }

    #[test]
    fn construction_rejects_invalid_parameters() {
        let path = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        assert_eq!(
            PolygonScanner::new(
                &path,
                0,
                4,
                0,
                FillRule::EvenOdd,
                OrientationHandling::KeepOriginal
            )
            .err(),
            Some(Error::InvalidSubsampling(0))
        );
        assert_eq!(
            PolygonScanner::new(
                &path,
                4,
                4,
                1,
                FillRule::EvenOdd,
                OrientationHandling::KeepOriginal
            )
            .err(),
            Some(Error::EmptyScanRange { min_y: 4, max_y: 4 })
        );
    }

    #[test]
    fn empty_path_scans_cleanly() {
        let mut scanner = PolygonScanner::new(
            &Path::default(),
            0,
            3,
            2,
            FillRule::EvenOdd,
            OrientationHandling::KeepOriginal,
        )
        .unwrap();
        let mut lines = 0;
        while scanner.move_to_next_pixel_line() {
            while scanner.move_to_next_subpixel_scan_line() {
                assert!(scanner.scan_current_line().is_empty());
                lines += 1;
            }
        }
        assert_eq!(lines, 7);
    }

    #[test]
    fn pump_counters_track_the_grid() {
        let path = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let mut scanner = PolygonScanner::new(
            &path,
            1,
            3,
            4,
            FillRule::EvenOdd,
            OrientationHandling::KeepOriginal,
        )
        .unwrap();
        assert_eq!(scanner.subpixel_fraction(), 0.25);
        assert!(scanner.move_to_next_pixel_line());
        assert_eq!(scanner.pixel_line_y(), 1);
        assert!(scanner.move_to_next_subpixel_scan_line());
        assert_eq!(scanner.sub_pixel_y(), 1.0);
        assert!(scanner.move_to_next_subpixel_scan_line());
        assert_eq!(scanner.sub_pixel_y(), 1.25);
    }

    #[test]
    fn scan_starts_mid_shape_when_min_y_is_inside() {
        // The triangle spans y 0..8; scanning from row 4 must pre-warm the
        // active list over the skipped rows.
        let path = polygon(&[(0.0, 0.0), (8.0, 8.0), (-8.0, 8.0)]);
        let mut scanner = PolygonScanner::new(
            &path,
            4,
            8,
            1,
            FillRule::EvenOdd,
            OrientationHandling::KeepOriginal,
        )
        .unwrap();
        assert!(scanner.move_to_next_pixel_line());
        assert!(scanner.move_to_next_subpixel_scan_line());
        assert_eq!(scanner.scan_current_line(), &[-4.0, 4.0]);
    }

    #[test]
    fn scanning_twice_on_one_line_is_stable() {
        let path = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let mut scanner = PolygonScanner::new(
            &path,
            0,
            4,
            1,
            FillRule::NonZero,
            OrientationHandling::FirstRingIsContourFollowedByHoles,
        )
        .unwrap();
        scanner.move_to_next_pixel_line();
        scanner.move_to_next_subpixel_scan_line();
        let first = scanner.scan_current_line().to_vec();
        let second = scanner.scan_current_line().to_vec();
        assert_eq!(first, second);
    }
}
