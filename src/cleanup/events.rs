//! Render events handed to the filter by a content stream interpreter.
//!
//! Each event carries an already extracted drawing primitive together with
//! the graphics state it was painted with. Nothing here knows about PDF
//! syntax.

use super::codec::ImageFormat;
use crate::geometry::{FillRule, Matrix, Path, Point, Quad, StrokeProps};

/// A stroked path (`S`, `s`, `B` and friends).
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeEvent {
    pub path: Path,
    /// Maps the path's user space to device space
    pub ctm: Matrix,
    pub props: StrokeProps,
}

/// A filled path (`f`, `f*`, `B`, `B*`).
#[derive(Debug, Clone, PartialEq)]
pub struct FillEvent {
    pub path: Path,
    pub ctm: Matrix,
    pub fill_rule: FillRule,
}

/// Straight line between two device space points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub const fn new(start: Point, end: Point) -> Self {
        LineSegment { start, end }
    }
}

/// Bounding quad spanned by an ascent and a descent line.
///
/// Vertex order: ascent start, ascent end, descent end, descent start.
pub fn text_quad(ascent: &LineSegment, descent: &LineSegment) -> Quad {
    [ascent.start, ascent.end, descent.end, descent.start]
}

/// One glyph of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphInfo {
    pub ascent: LineSegment,
    pub descent: LineSegment,
    /// Glyph advance in text space with font size and horizontal scaling
    /// applied, before the text matrix and CTM
    pub unscaled_width: f64,
    /// Raw string bytes that show this glyph
    pub content: Vec<u8>,
}

impl GlyphInfo {
    pub fn quad(&self) -> Quad {
        text_quad(&self.ascent, &self.descent)
    }
}

/// A string shown by a single text operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Ascent line of the whole run
    pub ascent: LineSegment,
    /// Descent line of the whole run
    pub descent: LineSegment,
    /// Raw string bytes of the whole run
    pub content: Vec<u8>,
    pub glyphs: Vec<GlyphInfo>,
    pub font_size: f64,
    /// Horizontal scaling `Tz`, in percent
    pub horizontal_scaling: f64,
}

impl TextRun {
    pub fn quad(&self) -> Quad {
        text_quad(&self.ascent, &self.descent)
    }
}

/// A painted image XObject or inline image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEvent<'a> {
    /// Maps the image's unit square to device space
    pub ctm: Matrix,
    /// Encoded image bytes
    pub data: &'a [u8],
    /// Declared encoding; `Unknown` is sniffed from the data
    pub format: ImageFormat,
}

/// Any event the filter can process.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent<'a> {
    Stroke(StrokeEvent),
    Fill(FillEvent),
    Text(TextRun),
    Image(ImageEvent<'a>),
}
