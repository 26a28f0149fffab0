//! Polygon boolean and offset capability.
//!
//! The clean-up core never clips polygons itself. It hands contours to a
//! [`PolygonEngine`] and consumes the contour tree it returns. The engine is
//! a trait so a caller can plug in its own clipper; [`DefaultEngine`] wires
//! `i_overlay` for boolean operations and `tiny-skia`'s stroker for offsets.
//!
//! Engine contract:
//! - `boolean` resolves subject and clip contours under their own fill rules
//!   before combining them. The result contains no zero-area polygons.
//! - `offset` turns every non-degenerate subpath of the input into a closed
//!   outline whose nonzero fill equals the painted stroke. Open subpaths whose
//!   segments all have zero length are not outlined; they are reported in
//!   `degenerate` with their index in the input path.

pub mod overlay;
pub mod stroker;

use crate::core::error::RedactResult;
use crate::geometry::{FillRule, LineCap, LineJoin, Path, Point, Subpath};

/// A closed polygon ring. The closing edge is implicit.
pub type Contour = Vec<Point>;

/// An outer ring together with the holes cut into it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

/// Nested contour tree returned by a boolean operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyTree {
    polygons: Vec<Polygon>,
}

impl PolyTree {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        PolyTree { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Rebuild a path: one closed subpath per ring, outer ring before its holes.
    pub fn to_path(&self) -> Path {
        let mut path = Path::new();
        for polygon in &self.polygons {
            let rings = std::iter::once(&polygon.outer).chain(polygon.holes.iter());
            path.add_subpaths(rings.filter_map(|ring| Subpath::polygon(ring)));
        }
        path
    }
}

/// Boolean operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOperation {
    Union,
    Difference,
    Intersection,
}

/// Role of a contour in a boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyType {
    Subject,
    Clip,
}

/// Parameters of a stroke offset.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetStyle {
    /// Full stroke width (the outline lies width / 2 on either side)
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
    /// Precision hint for the outline curves
    pub resolution_scale: f32,
}

/// A subpath that collapsed to a point under offsetting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateSubpath {
    /// Index of the subpath in the offset input
    pub index: usize,
    pub point: Point,
}

/// Outcome of a stroke offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OffsetResult {
    /// Closed outline, to be filled with the nonzero rule
    pub outline: Path,
    pub degenerate: Vec<DegenerateSubpath>,
}

/// Polygon boolean and offset operations used by the clean-up core.
pub trait PolygonEngine: Send + Sync {
    /// Combine `subject` with `clip`.
    fn boolean(
        &self,
        op: ClipOperation,
        subject: &[Contour],
        subject_fill: FillRule,
        clip: &[Contour],
        clip_fill: FillRule,
    ) -> RedactResult<PolyTree>;

    /// Outline the stroke of `path`.
    fn offset(&self, path: &Path, style: &OffsetStyle) -> RedactResult<OffsetResult>;
}

/// `i_overlay` booleans plus `tiny-skia` stroke offsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEngine;

impl PolygonEngine for DefaultEngine {
    fn boolean(
        &self,
        op: ClipOperation,
        subject: &[Contour],
        subject_fill: FillRule,
        clip: &[Contour],
        clip_fill: FillRule,
    ) -> RedactResult<PolyTree> {
        Ok(overlay::boolean(op, subject, subject_fill, clip, clip_fill))
    }

    fn offset(&self, path: &Path, style: &OffsetStyle) -> RedactResult<OffsetResult> {
        stroker::stroke_outline(path, style)
    }
}

/// Collects subject and clip contours for one boolean operation.
pub struct Clipper<'e, E: PolygonEngine + ?Sized> {
    engine: &'e E,
    subject: Vec<Contour>,
    clip: Vec<Contour>,
}

impl<'e, E: PolygonEngine + ?Sized> Clipper<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Clipper {
            engine,
            subject: Vec::new(),
            clip: Vec::new(),
        }
    }

    pub fn add_subject(&mut self, contour: Contour) -> &mut Self {
        self.add(contour, PolyType::Subject)
    }

    pub fn add_clip(&mut self, contour: Contour) -> &mut Self {
        self.add(contour, PolyType::Clip)
    }

    /// Add every drawable subpath of `path` as a flattened contour.
    ///
    /// Lone points are skipped; so are rings that flatten to fewer than two
    /// distinct points, since they enclose nothing.
    pub fn add_path(&mut self, path: &Path, flatness: f64, poly_type: PolyType) -> &mut Self {
        for subpath in path.subpaths() {
            if subpath.is_single_point() {
                continue;
            }
            let contour = subpath.piecewise_linear_approximation(flatness);
            if contour.len() > 1 {
                self.add(contour, poly_type);
            }
        }
        self
    }

    fn add(&mut self, contour: Contour, poly_type: PolyType) -> &mut Self {
        match poly_type {
            PolyType::Subject => self.subject.push(contour),
            PolyType::Clip => self.clip.push(contour),
        }
        self
    }

    pub fn execute(
        &self,
        op: ClipOperation,
        subject_fill: FillRule,
        clip_fill: FillRule,
    ) -> RedactResult<PolyTree> {
        if self.subject.is_empty() && op != ClipOperation::Union {
            return Ok(PolyTree::default());
        }
        self.engine
            .boolean(op, &self.subject, subject_fill, &self.clip, clip_fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;

    fn rect_contour(r: Rectangle) -> Contour {
        r.vertices().to_vec()
    }

    fn area(contour: &Contour) -> f64 {
        let n = contour.len();
        (0..n)
            .map(|i| {
                let (a, b) = (contour[i], contour[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            .abs()
            / 2.0
    }

    fn tree_area(tree: &PolyTree) -> f64 {
        tree.polygons()
            .iter()
            .map(|p| area(&p.outer) - p.holes.iter().map(area).sum::<f64>())
            .sum()
    }

    #[test]
    fn test_difference_removes_overlap() {
        let engine = DefaultEngine;
        let mut clipper = Clipper::new(&engine);
        clipper
            .add_subject(rect_contour(Rectangle::new(0.0, 0.0, 10.0, 10.0)))
            .add_clip(rect_contour(Rectangle::new(5.0, 0.0, 10.0, 10.0)));

        let tree = clipper
            .execute(ClipOperation::Difference, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert!((tree_area(&tree) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_clips_are_unioned() {
        let engine = DefaultEngine;
        let mut clipper = Clipper::new(&engine);
        clipper
            .add_subject(rect_contour(Rectangle::new(0.0, 0.0, 10.0, 10.0)))
            .add_clip(rect_contour(Rectangle::new(0.0, 0.0, 6.0, 10.0)))
            .add_clip(rect_contour(Rectangle::new(4.0, 0.0, 6.0, 10.0)));

        // Even-odd on the subject must not punch the clip overlap back in
        let tree = clipper
            .execute(ClipOperation::Difference, FillRule::EvenOdd, FillRule::NonZero)
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_intersection_of_disjoint_is_empty() {
        let engine = DefaultEngine;
        let mut clipper = Clipper::new(&engine);
        clipper
            .add_subject(rect_contour(Rectangle::new(0.0, 0.0, 1.0, 1.0)))
            .add_clip(rect_contour(Rectangle::new(2.0, 2.0, 1.0, 1.0)));

        let tree = clipper
            .execute(ClipOperation::Intersection, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_subject_short_circuits() {
        let engine = DefaultEngine;
        let mut clipper = Clipper::new(&engine);
        clipper.add_clip(rect_contour(Rectangle::new(0.0, 0.0, 1.0, 1.0)));
        let tree = clipper
            .execute(ClipOperation::Difference, FillRule::NonZero, FillRule::NonZero)
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_poly_tree_to_path() {
        let tree = PolyTree::new(vec![Polygon {
            outer: rect_contour(Rectangle::new(0.0, 0.0, 10.0, 10.0)),
            holes: vec![rect_contour(Rectangle::new(2.0, 2.0, 2.0, 2.0))],
        }]);
        let path = tree.to_path();
        assert_eq!(path.len(), 2);
        assert!(path.subpaths().iter().all(|s| s.is_closed()));
        assert_eq!(path.bounding_box(), Some((0.0, 0.0, 10.0, 10.0)));
    }
}
