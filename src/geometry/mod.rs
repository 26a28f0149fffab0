//! Geometry primitives shared by every clean-up operation.
//!
//! - Points, affine matrices, rectangles and quads
//! - Paths built from line and cubic Bezier segments, with polyline flattening
//! - Stroke and fill parameters taken from the graphics state

pub mod matrix;
pub mod path;
pub mod point;
pub mod rect;
pub mod style;

pub use matrix::Matrix;
pub use path::{Path, PathElement, Segment, Subpath};
pub use point::Point;
pub use rect::{Quad, Rectangle};
pub use style::{DashArray, FillRule, LineCap, LineJoin, StrokeProps};
