//! Path construction and management.
//!
//! A path is an ordered list of subpaths, each a chain of line and cubic
//! Bezier segments starting at a point. Paths are built incrementally with
//! move, line, curve, rectangle and close operations, exactly like a PDF
//! content stream builds them, and can be flattened into polylines for the
//! dash and offset math.

use std::fmt;

use super::matrix::Matrix;
use super::point::Point;

/// Recursion depth cap for curve flattening (2^16 pieces at most).
const MAX_FLATTEN_DEPTH: u32 = 16;

/// A path element, the form in which a serializer writes the path back out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    /// Move to a new point (starts a new subpath)
    MoveTo(f64, f64),
    /// Line to a point
    LineTo(f64, f64),
    /// Cubic Bézier curve (cp1x, cp1y, cp2x, cp2y, x, y)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Close the current subpath
    ClosePath,
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::MoveTo(x, y) => write!(f, "M {} {}", x, y),
            PathElement::LineTo(x, y) => write!(f, "L {} {}", x, y),
            PathElement::CurveTo(cp1x, cp1y, cp2x, cp2y, x, y) => {
                write!(f, "C {} {} {} {} {} {}", cp1x, cp1y, cp2x, cp2y, x, y)
            }
            PathElement::ClosePath => write!(f, "Z"),
        }
    }
}

/// One segment of a subpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point, Point),
    /// Start, first control point, second control point, end
    Cubic(Point, Point, Point, Point),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(p0, _) | Segment::Cubic(p0, ..) => *p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(_, p1) | Segment::Cubic(_, _, _, p1) => *p1,
        }
    }

    /// True when every defining point coincides.
    pub fn is_zero_length(&self) -> bool {
        match self {
            Segment::Line(p0, p1) => p0 == p1,
            Segment::Cubic(p0, p1, p2, p3) => p0 == p1 && p0 == p2 && p0 == p3,
        }
    }

    /// Polyline approximation, including both end points.
    pub fn flatten(&self, flatness: f64) -> Vec<Point> {
        match *self {
            Segment::Line(p0, p1) => vec![p0, p1],
            Segment::Cubic(p0, p1, p2, p3) => {
                let mut out = vec![p0];
                flatten_cubic(p0, p1, p2, p3, flatness, 0, &mut out);
                out
            }
        }
    }

    fn transformed(&self, m: &Matrix) -> Segment {
        match *self {
            Segment::Line(p0, p1) => Segment::Line(m.transform_point(p0), m.transform_point(p1)),
            Segment::Cubic(p0, p1, p2, p3) => Segment::Cubic(
                m.transform_point(p0),
                m.transform_point(p1),
                m.transform_point(p2),
                m.transform_point(p3),
            ),
        }
    }
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn distance_to_chord(p: Point, a: Point, b: Point) -> f64 {
    let chord = b - a;
    let len = chord.length();
    if len == 0.0 {
        return p.distance(a);
    }
    ((p.x - a.x) * chord.y - (p.y - a.y) * chord.x).abs() / len
}

/// Adaptive de Casteljau subdivision. Pushes every point after `p0`.
fn flatten_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    flatness: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let flat = distance_to_chord(p1, p0, p3) <= flatness && distance_to_chord(p2, p0, p3) <= flatness;
    if flat || depth >= MAX_FLATTEN_DEPTH {
        out.push(p3);
        return;
    }

    let p01 = p0.lerp(p1, 0.5);
    let p12 = p1.lerp(p2, 0.5);
    let p23 = p2.lerp(p3, 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    let mid = p012.lerp(p123, 0.5);

    flatten_cubic(p0, p01, p012, mid, flatness, depth + 1, out);
    flatten_cubic(mid, p123, p23, p3, flatness, depth + 1, out);
}

/// Append `p` unless it repeats the last point.
pub(crate) fn push_distinct(points: &mut Vec<Point>, p: Point) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}

/// A contiguous chain of segments within a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    start: Point,
    segments: Vec<Segment>,
    closed: bool,
    /// The implicit close was replaced by an explicit line segment
    synthesized_close: bool,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Subpath {
            start,
            segments: Vec::new(),
            closed: false,
            synthesized_close: false,
        }
    }

    /// Build a closed polygon subpath from its vertices.
    pub fn polygon(vertices: &[Point]) -> Option<Self> {
        let (first, rest) = vertices.split_first()?;
        let mut subpath = Subpath::new(*first);
        let mut prev = *first;
        for v in rest {
            subpath.segments.push(Segment::Line(prev, *v));
            prev = *v;
        }
        subpath.closed = true;
        Some(subpath)
    }

    pub fn start_point(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn is_synthesized_close(&self) -> bool {
        self.synthesized_close
    }

    /// End point of the last segment, or the start point of an empty subpath.
    pub fn last_point(&self) -> Point {
        self.segments.last().map_or(self.start, Segment::end)
    }

    /// A lone point with no segments and no close.
    pub fn is_single_point(&self) -> bool {
        self.segments.is_empty() && !self.closed
    }

    /// An open subpath whose segments all have zero length.
    ///
    /// Offsetting such a subpath collapses to a point rather than a ribbon.
    pub fn is_degenerate(&self) -> bool {
        !self.closed
            && !self.segments.is_empty()
            && self.segments.iter().all(|s| s.is_zero_length() && s.start() == self.start)
    }

    /// Polyline approximation of the subpath.
    ///
    /// Starts with the start point and follows every segment; consecutive
    /// duplicate points are dropped. The implicit closing edge of a closed
    /// subpath is not included.
    pub fn piecewise_linear_approximation(&self, flatness: f64) -> Vec<Point> {
        let mut points = vec![self.start];
        for segment in &self.segments {
            for p in segment.flatten(flatness).into_iter().skip(1) {
                push_distinct(&mut points, p);
            }
        }
        points
    }
}

/// A path: an ordered list of independent subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    /// Create a new empty path.
    pub fn new() -> Self {
        Path {
            subpaths: Vec::new(),
        }
    }

    pub fn from_subpaths(subpaths: Vec<Subpath>) -> Self {
        Path { subpaths }
    }

    /// Move to a new point, starting a new subpath.
    ///
    /// If the current subpath is a lone open point it is moved instead, so
    /// repeated moves never leave stray points behind.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        match self.subpaths.last_mut() {
            Some(last) if last.is_single_point() => last.start = p,
            _ => self.subpaths.push(Subpath::new(p)),
        }
    }

    /// Subpath that the next segment should be appended to.
    ///
    /// Without a current point this performs an implicit move to `implicit`.
    /// After a close the new segment starts a fresh subpath at the closed
    /// subpath's start point.
    fn open_subpath(&mut self, implicit: Point) -> &mut Subpath {
        let restart = match self.subpaths.last() {
            None => Some(implicit),
            Some(last) if last.closed => Some(last.start),
            Some(_) => None,
        };
        if let Some(start) = restart {
            self.subpaths.push(Subpath::new(start));
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    /// Add a line segment from the current point to (x, y).
    pub fn line_to(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        let had_point = self.current_point().is_some();
        let subpath = self.open_subpath(p);
        if had_point {
            let from = subpath.last_point();
            subpath.segments.push(Segment::Line(from, p));
        }
    }

    /// Add a cubic Bézier curve.
    ///
    /// # Arguments
    /// * `cp1x, cp1y` - First control point
    /// * `cp2x, cp2y` - Second control point
    /// * `x, y` - End point
    pub fn curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        let cp1 = Point::new(cp1x, cp1y);
        let subpath = self.open_subpath(cp1);
        let from = subpath.last_point();
        subpath
            .segments
            .push(Segment::Cubic(from, cp1, Point::new(cp2x, cp2y), Point::new(x, y)));
    }

    /// Add a rectangle to the path.
    ///
    /// This is equivalent to:
    /// ```text
    /// move_to(x, y)
    /// line_to(x + width, y)
    /// line_to(x + width, y + height)
    /// line_to(x, y + height)
    /// close_path()
    /// ```
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        if let Some(last) = self.subpaths.last_mut() {
            if !last.segments.is_empty() {
                last.closed = true;
            }
        }
    }

    /// Get the current point.
    pub fn current_point(&self) -> Option<Point> {
        self.subpaths.last().map(|s| {
            if s.closed {
                s.start
            } else {
                s.last_point()
            }
        })
    }

    pub fn add_subpath(&mut self, subpath: Subpath) {
        self.subpaths.push(subpath);
    }

    pub fn add_subpaths(&mut self, subpaths: impl IntoIterator<Item = Subpath>) {
        self.subpaths.extend(subpaths);
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Get the number of subpaths in the path.
    pub fn len(&self) -> usize {
        self.subpaths.len()
    }

    /// Mark every subpath with at least one segment as closed.
    pub fn close_all_subpaths(&mut self) {
        for subpath in &mut self.subpaths {
            if !subpath.segments.is_empty() {
                subpath.closed = true;
            }
        }
    }

    /// Replace every implicit close with an explicit line back to the start.
    ///
    /// The affected subpaths become open and are flagged as synthesized-close.
    /// Returns their indices.
    pub fn replace_close_with_line(&mut self) -> Vec<usize> {
        let mut modified = Vec::new();

        for (i, subpath) in self.subpaths.iter_mut().enumerate() {
            if !subpath.closed {
                continue;
            }
            let last = subpath.last_point();
            if last != subpath.start {
                subpath.segments.push(Segment::Line(last, subpath.start));
            }
            subpath.closed = false;
            subpath.synthesized_close = true;
            modified.push(i);
        }

        modified
    }

    /// Polyline approximation of the whole path, with consecutive duplicate
    /// points removed across subpath boundaries.
    pub fn approximation(&self, flatness: f64) -> Vec<Point> {
        let mut points = Vec::new();
        for subpath in &self.subpaths {
            for p in subpath.piecewise_linear_approximation(flatness) {
                push_distinct(&mut points, p);
            }
        }
        points
    }

    /// Apply `matrix` to every point of the path.
    pub fn transformed(&self, matrix: &Matrix) -> Path {
        let subpaths = self
            .subpaths
            .iter()
            .map(|s| Subpath {
                start: matrix.transform_point(s.start),
                segments: s.segments.iter().map(|seg| seg.transformed(matrix)).collect(),
                closed: s.closed,
                synthesized_close: s.synthesized_close,
            })
            .collect();
        Path { subpaths }
    }

    /// Get the path elements in serialization order.
    pub fn elements(&self) -> Vec<PathElement> {
        let mut elements = Vec::new();

        for subpath in &self.subpaths {
            elements.push(PathElement::MoveTo(subpath.start.x, subpath.start.y));
            for segment in &subpath.segments {
                elements.push(match *segment {
                    Segment::Line(_, p) => PathElement::LineTo(p.x, p.y),
                    Segment::Cubic(_, c1, c2, p) => {
                        PathElement::CurveTo(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                    }
                });
            }
            if subpath.closed {
                elements.push(PathElement::ClosePath);
            }
        }

        elements
    }

    /// Get the bounding box of the path.
    ///
    /// This returns a rough bounding box by finding the min/max x and y
    /// coordinates of all points, control points included.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        if self.subpaths.is_empty() {
            return None;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        let mut include = |p: Point| {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        };

        for subpath in &self.subpaths {
            include(subpath.start);
            for segment in &subpath.segments {
                match *segment {
                    Segment::Line(_, p) => include(p),
                    Segment::Cubic(_, c1, c2, p) => {
                        include(c1);
                        include(c2);
                        include(p);
                    }
                }
            }
        }

        Some((min_x, min_y, max_x, max_y))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for el in self.elements() {
            write!(f, "{} ", el)?;
        }
        Ok(())
    }
}
