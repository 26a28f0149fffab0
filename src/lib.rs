//! Region based redaction of PDF render primitives.
//!
//! The crate works on content that a content stream interpreter has already
//! extracted: stroked and filled paths, glyph runs and placed images, each
//! with its transform and graphics state. Given a list of device space
//! rectangles, [`CleanUpFilter`] returns the same content with everything
//! inside the rectangles removed:
//!
//! - paths come back as the remaining fill region
//! - glyphs inside a region turn into spacing adjustments
//! - images are painted over, or dropped when fully covered
//!
//! Polygon clipping and image coding sit behind the
//! [`PolygonEngine`](clipper::PolygonEngine) and
//! [`ImageCodec`](cleanup::ImageCodec) traits.

pub mod cleanup;
pub mod clipper;
pub mod core;
pub mod geometry;

// Re-export main types for convenience
pub use cleanup::{
    CleanUpFilter, DashPattern, FillEvent, FilterOutput, GlyphInfo, ImageEvent, ImageFilterResult,
    ImageFormat, LineSegment, RenderEvent, StrokeEvent, TextArray, TextArrayElement, TextRun,
};
pub use crate::core::{CleanUpConfig, RedactError, RedactResult};
pub use geometry::{
    FillRule, LineCap, LineJoin, Matrix, Path, PathElement, Point, Rectangle, StrokeProps,
};
