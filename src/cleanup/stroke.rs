//! Stroke to fill conversion.
//!
//! A stroke is turned into the region it paints: the (possibly dashed) path
//! is outlined by the polygon engine, caps of zero-length dashes that the
//! outliner cannot represent are rebuilt by hand, and the redaction regions
//! are subtracted from the result with the nonzero rule.

use std::borrow::Cow;
use std::f64::consts::FRAC_PI_2;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use super::dasher::apply_dash_pattern;
use super::fill::filter_fill_path;
use crate::clipper::{DegenerateSubpath, OffsetStyle, PolygonEngine};
use crate::core::config::{CIRCLE_APPROXIMATION_CONST, CleanUpConfig};
use crate::core::error::{RedactError, RedactResult};
use crate::geometry::{
    FillRule, LineCap, Matrix, Path, Point, Rectangle, Segment, StrokeProps, Subpath,
};

/// Line through two points in the form `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy)]
struct StandardLine {
    a: f64,
    b: f64,
    c: f64,
}

impl StandardLine {
    fn new(p1: Point, p2: Point) -> Self {
        let a = p2.y - p1.y;
        let b = p1.x - p2.x;
        let c = p1.y * -b - p1.x * a;
        StandardLine { a, b, c }
    }

    fn slope(&self) -> f64 {
        if self.b == 0.0 {
            f64::INFINITY
        } else {
            -self.a / self.b
        }
    }

    fn contains(&self, p: Point, tolerance: f64) -> bool {
        (self.a * p.x + self.b * p.y + self.c).abs() < tolerance
    }
}

/// Rotation that aligns a square with a line of the given slope.
fn angle_from_slope(slope: f64) -> f64 {
    if slope.is_finite() {
        slope.atan()
    } else {
        FRAC_PI_2
    }
}

/// Walks the polyline of the undashed path in order, looking for the line
/// that passes through each degenerate point in turn.
///
/// The walk never rewinds: degenerate points are produced in path order, so
/// each search resumes at the line where the previous one stopped.
struct DirectionWalker {
    points: Vec<Point>,
    next: usize,
    line: StandardLine,
    tolerance: f64,
}

impl DirectionWalker {
    /// `None` when the polyline has fewer than two points.
    fn new(points: Vec<Point>, tolerance: f64) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let line = StandardLine::new(points[0], points[1]);
        Some(DirectionWalker {
            points,
            next: 2,
            line,
            tolerance,
        })
    }

    fn angle_at(&mut self, p: Point) -> RedactResult<f64> {
        while !self.line.contains(p, self.tolerance) {
            let Some(&end) = self.points.get(self.next) else {
                return Err(RedactError::CapDirectionNotFound { x: p.x, y: p.y });
            };
            self.line = StandardLine::new(self.points[self.next - 1], end);
            self.next += 1;
        }
        Ok(angle_from_slope(self.line.slope()))
    }
}

/// Closed four-arc approximation of a circle.
pub fn circle(center: Point, radius: f64) -> Subpath {
    let (x, y) = (center.x, center.y);
    let k = radius * CIRCLE_APPROXIMATION_CONST;

    let top = Point::new(x, y + radius);
    let right = Point::new(x + radius, y);
    let bottom = Point::new(x, y - radius);
    let left = Point::new(x - radius, y);

    let mut subpath = Subpath::new(top);
    subpath.add_segment(Segment::Cubic(
        top,
        Point::new(x + k, y + radius),
        Point::new(x + radius, y + k),
        right,
    ));
    subpath.add_segment(Segment::Cubic(
        right,
        Point::new(x + radius, y - k),
        Point::new(x + k, y - radius),
        bottom,
    ));
    subpath.add_segment(Segment::Cubic(
        bottom,
        Point::new(x - k, y - radius),
        Point::new(x - radius, y - k),
        left,
    ));
    subpath.add_segment(Segment::Cubic(
        left,
        Point::new(x - radius, y + k),
        Point::new(x - k, y + radius),
        top,
    ));
    subpath.set_closed(true);
    subpath
}

/// Closed square of half side `half` centred on `center`, rotated by `angle`.
pub fn construct_square(center: Point, half: f64, angle: f64) -> Subpath {
    let placement = Matrix::translate(center.x, center.y).concat(&Matrix::rotate(angle));
    let vertices = placement.transform_points(&[
        Point::new(-half, -half),
        Point::new(-half, half),
        Point::new(half, half),
        Point::new(half, -half),
    ]);

    let mut subpath = Subpath::new(vertices[0]);
    for (i, v) in vertices.iter().enumerate() {
        subpath.add_segment(Segment::Line(*v, vertices[(i + 1) % vertices.len()]));
    }
    subpath.set_closed(true);
    subpath
}

fn convert_to_circles(degenerate: &[DegenerateSubpath], radius: f64) -> Vec<Subpath> {
    degenerate.iter().map(|d| circle(d.point, radius)).collect()
}

/// Squares for each degenerate point, aligned with the stroke direction.
///
/// The direction recorded while dashing is used when present. Otherwise the
/// polyline of `source` is searched for a line through the point; with fewer
/// than two polyline points no squares can be oriented and none are built.
fn convert_to_squares(
    degenerate: &[DegenerateSubpath],
    width: f64,
    source: &Path,
    directions: &FxHashMap<usize, Point>,
    config: &CleanUpConfig,
) -> RedactResult<Vec<Subpath>> {
    let Some(mut walker) = DirectionWalker::new(
        source.approximation(config.curve_flatness),
        config.point_on_line_tolerance,
    ) else {
        warn!("Path has fewer than two distinct points, skipping {} square caps", degenerate.len());
        return Ok(Vec::new());
    };

    let half = width / 2.0;
    degenerate
        .iter()
        .map(|d| {
            let angle = match directions.get(&d.index) {
                Some(dir) if dir.x == 0.0 => FRAC_PI_2,
                Some(dir) => (dir.y / dir.x).atan(),
                None => walker.angle_at(d.point)?,
            };
            Ok(construct_square(d.point, half, angle))
        })
        .collect()
}

/// Outline of the area painted by stroking `path`, in the path's own space.
///
/// The outline is meant to be filled with the nonzero rule.
pub fn stroke_to_fill<E: PolygonEngine + ?Sized>(
    engine: &E,
    path: &Path,
    props: &StrokeProps,
    config: &CleanUpConfig,
) -> RedactResult<Path> {
    let (stroked, directions) = match props.dash.as_ref().filter(|d| !d.is_solid()) {
        Some(dash) => {
            let dashed = apply_dash_pattern(path, &mut dash.cursor(), config.curve_flatness);
            (Cow::Owned(dashed.path), dashed.directions)
        }
        None => (Cow::Borrowed(path), FxHashMap::default()),
    };

    let style = OffsetStyle {
        width: props.line_width,
        cap: props.line_cap,
        join: props.line_join,
        miter_limit: props.miter_limit,
        resolution_scale: config.stroke_resolution_scale,
    };
    let offset = engine.offset(&stroked, &style)?;
    let mut outline = offset.outline;

    if !offset.degenerate.is_empty() {
        match props.line_cap {
            LineCap::Round => {
                outline.add_subpaths(convert_to_circles(&offset.degenerate, props.line_width / 2.0));
            }
            LineCap::ProjectingSquare if props.dash.is_some() => {
                let squares =
                    convert_to_squares(&offset.degenerate, props.line_width, path, &directions, config)?;
                outline.add_subpaths(squares);
            }
            _ => {}
        }
        debug!(
            "Stroke has {} degenerate subpaths with {:?} caps",
            offset.degenerate.len(),
            props.line_cap
        );
    }

    Ok(outline)
}

/// Redact a stroked path: outline it, then subtract the regions.
pub fn filter_stroke_path<E: PolygonEngine + ?Sized>(
    engine: &E,
    regions: &[Rectangle],
    path: &Path,
    ctm: &Matrix,
    props: &StrokeProps,
    config: &CleanUpConfig,
) -> RedactResult<Path> {
    let outline = stroke_to_fill(engine, path, props, config)?;
    filter_fill_path(engine, regions, &outline, ctm, FillRule::NonZero, config.curve_flatness)
}
