//! Conversion of a path into its dashed form.
//!
//! Each subpath is flattened and walked point to point. Dash elements draw
//! lines, gap elements move the pen; an element that does not fit into the
//! current polyline segment is clipped at the segment end and its rest is
//! carried into the next segment.

use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};

use super::dash::DashCursor;
use crate::core::config::{MAX_DASH_ELEMENTS, MIN_DASH_CYCLE_LENGTH};
use crate::geometry::{Path, Point};

/// A dashed path plus the stroke direction at each zero-length dash.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashedPath {
    pub path: Path,
    /// Unit direction of the source segment, keyed by the index of the
    /// output subpath holding a zero-length dash
    pub directions: FxHashMap<usize, Point>,
}

impl DashedPath {
    /// Emit one dash or gap ending at `dash_to` on the segment
    /// `seg_start`-`seg_end`. A target beyond the segment is clamped to the
    /// segment end; the overshoot is returned.
    fn apply_dash(&mut self, seg_start: Point, seg_end: Point, dash_to: Point, is_gap: bool) -> f64 {
        let (target, remaining) = if lies_on_segment(seg_start, seg_end, dash_to) {
            (dash_to, 0.0)
        } else {
            (seg_end, dash_to.distance(seg_end))
        };

        if is_gap {
            self.path.move_to(target.x, target.y);
        } else {
            if self.path.current_point() == Some(target) {
                let index = self.path.len() - 1;
                self.directions
                    .insert(index, (seg_end - seg_start).normalized());
            }
            self.path.line_to(target.x, target.y);
        }

        remaining
    }
}

/// Point at distance `dist` from `from`, heading towards `towards`.
fn point_along(from: Point, towards: Point, dist: f64) -> Point {
    from + (towards - from).normalized() * dist
}

/// Inclusive bounding-box test of `p` against the segment.
fn lies_on_segment(seg_start: Point, seg_end: Point, p: Point) -> bool {
    p.x >= seg_start.x.min(seg_end.x)
        && p.x <= seg_start.x.max(seg_end.x)
        && p.y >= seg_start.y.min(seg_end.y)
        && p.y <= seg_start.y.max(seg_end.y)
}

fn undashed(path: &Path) -> DashedPath {
    DashedPath {
        path: path.clone(),
        directions: FxHashMap::default(),
    }
}

/// Replace `path` by its dashed form.
///
/// Closed subpaths are first closed with an explicit line; for those an
/// extra element is drawn over the first segment so the seam is joined the
/// way an implicit close would join it. The pattern restarts at the
/// beginning of every subpath. Subpaths that flatten to fewer than two
/// points are dropped.
///
/// A pattern whose cycle is shorter than [`MIN_DASH_CYCLE_LENGTH`] would
/// never reach the end of a segment, and one that would expand the path
/// into more than [`MAX_DASH_ELEMENTS`] dashes and gaps is not expanded
/// either. In both cases the path is returned undashed.
pub fn apply_dash_pattern(path: &Path, cursor: &mut DashCursor<'_>, flatness: f64) -> DashedPath {
    let cycle = cursor.pattern().cycle_length();
    if !(cycle >= MIN_DASH_CYCLE_LENGTH) {
        warn!(
            "Dash pattern {:?} has cycle length {}, stroking it as solid",
            cursor.pattern().array(),
            cycle
        );
        return undashed(path);
    }

    let mut source = path.clone();
    let synthesized: FxHashSet<usize> = source.replace_close_with_line().into_iter().collect();
    let approximations: Vec<Vec<Point>> = source
        .subpaths()
        .iter()
        .map(|subpath| subpath.piecewise_linear_approximation(flatness))
        .collect();

    let length: f64 = approximations
        .iter()
        .flat_map(|approx| approx.windows(2))
        .map(|seg| seg[0].distance(seg[1]))
        .sum();
    let elements = length / cycle * cursor.pattern().array().len() as f64;
    if elements > MAX_DASH_ELEMENTS {
        warn!(
            "Dash pattern {:?} would split a path of length {} into {:.0} elements, stroking it as solid",
            cursor.pattern().array(),
            length,
            elements
        );
        return undashed(path);
    }

    let mut dashed = DashedPath::default();

    for (index, approx) in approximations.iter().enumerate() {
        if approx.len() > 1 {
            dashed.path.move_to(approx[0].x, approx[0].y);
            let mut remaining = 0.0;
            let mut remaining_is_gap = false;

            for seg in approx.windows(2) {
                let (seg_start, seg_end) = (seg[0], seg[1]);
                let mut next_point = None;

                if remaining != 0.0 {
                    let p = point_along(seg_start, seg_end, remaining);
                    remaining = dashed.apply_dash(seg_start, seg_end, p, remaining_is_gap);
                    next_point = Some(p);
                }

                while remaining == 0.0 && dashed.path.current_point() != Some(seg_end) {
                    let Some(elem) = cursor.next() else {
                        break;
                    };
                    let from = next_point.unwrap_or(seg_start);
                    let p = point_along(from, seg_end, elem.length);
                    remaining = dashed.apply_dash(seg_start, seg_end, p, elem.is_gap);
                    remaining_is_gap = elem.is_gap;
                    next_point = Some(p);
                }
            }

            if synthesized.contains(&index) {
                cursor.reset();
                if let Some(elem) = cursor.next() {
                    let p = point_along(approx[0], approx[1], elem.length);
                    dashed.apply_dash(approx[0], approx[1], p, elem.is_gap);
                }
            }
        }

        cursor.reset();
    }

    dashed
}
