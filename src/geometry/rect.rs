use super::matrix::Matrix;
use super::point::Point;

/// A quadrilateral given by its four vertices in drawing order.
pub type Quad = [Point; 4];

/// An axis-aligned rectangle.
///
/// Depending on context the rectangle lives in device space (redaction
/// regions, image placement) or in an image's normalized unit square.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub const fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Rectangle {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Build a rectangle from its left, bottom, right and top edges.
    pub fn from_edges(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Rectangle::new(left, bottom, right - left, top - bottom)
    }

    /// Axis-aligned bounds of a set of points.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Rectangle::from_edges(min_x, min_y, max_x, max_y))
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// Corners in the order left-bottom, right-bottom, right-top, left-top.
    pub fn vertices(&self) -> Quad {
        [
            Point::new(self.left, self.bottom),
            Point::new(self.right(), self.bottom),
            Point::new(self.right(), self.top()),
            Point::new(self.left, self.top()),
        ]
    }

    /// Axis-aligned intersection with another rectangle.
    ///
    /// Returns `None` when the overlap has no area (touching edges included).
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let x1 = self.left.max(other.left);
        let y1 = self.bottom.max(other.bottom);
        let x2 = self.right().min(other.right());
        let y2 = self.top().min(other.top());

        if x2 - x1 > 0.0 && y2 - y1 > 0.0 {
            Some(Rectangle::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Bounds of this rectangle's corners after applying `matrix`.
    pub fn transformed_bounds(&self, matrix: &Matrix) -> Rectangle {
        let corners = matrix.transform_points(&self.vertices());
        // Four corners are always present.
        Rectangle::from_points(&corners).unwrap_or_default()
    }
}
