//! Boolean operations backed by `i_overlay`.
//!
//! `i_overlay` evaluates one fill rule for both operands, while the clean-up
//! filter needs an independent rule for subject and clip. Each operand is
//! therefore first resolved on its own into non-overlapping shapes, after
//! which the final combination is rule-agnostic and runs with even-odd.

use i_overlay::core::fill_rule::FillRule as OverlayFillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use super::{ClipOperation, Contour, PolyTree, Polygon};
use crate::geometry::{FillRule, Point};

type OverlayContour = Vec<[f64; 2]>;
type OverlayShapes = Vec<Vec<OverlayContour>>;

fn overlay_fill_rule(rule: FillRule) -> OverlayFillRule {
    match rule {
        FillRule::NonZero => OverlayFillRule::NonZero,
        FillRule::EvenOdd => OverlayFillRule::EvenOdd,
    }
}

fn overlay_rule(op: ClipOperation) -> OverlayRule {
    match op {
        ClipOperation::Union => OverlayRule::Union,
        ClipOperation::Difference => OverlayRule::Difference,
        ClipOperation::Intersection => OverlayRule::Intersect,
    }
}

/// Convert rings to `i_overlay` contours.
///
/// Repeated vertices and a closing vertex equal to the first are removed,
/// `i_overlay` treats rings as implicitly closed.
fn to_overlay(contours: &[Contour]) -> Vec<OverlayContour> {
    contours
        .iter()
        .filter_map(|c| {
            let mut ring: OverlayContour = Vec::with_capacity(c.len());
            for p in c {
                let p = p.to_array();
                if ring.last() != Some(&p) {
                    ring.push(p);
                }
            }
            while ring.len() > 1 && ring.last() == ring.first() {
                ring.pop();
            }
            (ring.len() > 2).then_some(ring)
        })
        .collect()
}

/// Resolve self-overlaps of `contours` under `rule` into simple rings.
fn resolve(contours: Vec<OverlayContour>, rule: FillRule) -> Vec<OverlayContour> {
    if contours.is_empty() {
        return contours;
    }
    let none: Vec<OverlayContour> = Vec::new();
    contours
        .overlay(&none, OverlayRule::Subject, overlay_fill_rule(rule))
        .into_iter()
        .flatten()
        .collect()
}

fn to_tree(shapes: OverlayShapes) -> PolyTree {
    let polygons = shapes
        .into_iter()
        .filter_map(|shape| {
            let mut rings = shape
                .into_iter()
                .map(|ring| ring.into_iter().map(Point::from).collect::<Contour>());
            let outer = rings.next()?;
            Some(Polygon {
                outer,
                holes: rings.collect(),
            })
        })
        .collect();
    PolyTree::new(polygons)
}

/// Run `op` on `subject` and `clip`, each resolved under its own fill rule.
pub fn boolean(
    op: ClipOperation,
    subject: &[Contour],
    subject_fill: FillRule,
    clip: &[Contour],
    clip_fill: FillRule,
) -> PolyTree {
    let subject = resolve(to_overlay(subject), subject_fill);
    let clip = resolve(to_overlay(clip), clip_fill);

    if subject.is_empty() && clip.is_empty() {
        return PolyTree::default();
    }

    to_tree(subject.overlay(&clip, overlay_rule(op), OverlayFillRule::EvenOdd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Contour {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    #[test]
    fn test_nested_squares_even_odd_has_hole() {
        let subject = vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 6.0)];
        let tree = boolean(
            ClipOperation::Difference,
            &subject,
            FillRule::EvenOdd,
            &[],
            FillRule::NonZero,
        );
        assert_eq!(tree.polygons().len(), 1);
        assert_eq!(tree.polygons()[0].holes.len(), 1);
    }

    #[test]
    fn test_nested_squares_same_winding_nonzero_is_solid() {
        let subject = vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 6.0)];
        let tree = boolean(
            ClipOperation::Difference,
            &subject,
            FillRule::NonZero,
            &[],
            FillRule::NonZero,
        );
        assert_eq!(tree.polygons().len(), 1);
        assert!(tree.polygons()[0].holes.is_empty());
    }

    fn ring_area(tree: &PolyTree) -> f64 {
        tree.polygons()
            .iter()
            .map(|polygon| {
                let n = polygon.outer.len();
                let twice: f64 = (0..n)
                    .map(|i| {
                        let (a, b) = (polygon.outer[i], polygon.outer[(i + 1) % n]);
                        a.x * b.y - b.x * a.y
                    })
                    .sum();
                twice.abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_explicit_closing_vertex_keeps_every_corner() {
        let mut closed = square(0.0, 0.0, 10.0);
        closed.push(Point::new(0.0, 0.0));
        let tree = boolean(
            ClipOperation::Difference,
            &[closed],
            FillRule::NonZero,
            &[],
            FillRule::NonZero,
        );
        assert_eq!(tree.polygons().len(), 1);
        assert_eq!(tree.polygons()[0].outer.len(), 4);
        assert!((ring_area(&tree) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_vertices_are_collapsed() {
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(to_overlay(&[ring]), vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]]);
    }

    #[test]
    fn test_degenerate_rings_are_dropped() {
        let line = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        let tree = boolean(
            ClipOperation::Union,
            &[line],
            FillRule::NonZero,
            &[],
            FillRule::NonZero,
        );
        assert!(tree.is_empty());
    }
}
