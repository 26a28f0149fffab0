//! Glyph level text redaction.
//!
//! Glyphs are never cut. A glyph whose bounding quad overlaps a region is
//! replaced by a spacing adjustment of the same advance, every other glyph is
//! shown unchanged, so glyphs after a removed one keep their positions.

use log::debug;

use super::events::TextRun;
use crate::clipper::{ClipOperation, Clipper, PolygonEngine};
use crate::core::error::{RedactError, RedactResult};
use crate::geometry::{FillRule, Quad, Rectangle};

/// Element of a `TJ` operand array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextArrayElement {
    /// String bytes to show
    Literal(Vec<u8>),
    /// Horizontal displacement in thousandths of text space units; negative
    /// values move to the right
    Adjustment(f64),
}

/// A `TJ` operand array under construction.
///
/// Adjacent literals are concatenated and adjacent adjustments summed, which
/// keeps the serialized array minimal without changing its meaning.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextArray {
    elements: Vec<TextArrayElement>,
}

impl TextArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_literal(&mut self, bytes: &[u8]) {
        match self.elements.last_mut() {
            Some(TextArrayElement::Literal(last)) => last.extend_from_slice(bytes),
            _ => self.elements.push(TextArrayElement::Literal(bytes.to_vec())),
        }
    }

    pub fn push_adjustment(&mut self, amount: f64) {
        match self.elements.last_mut() {
            Some(TextArrayElement::Adjustment(last)) => *last += amount,
            _ => self.elements.push(TextArrayElement::Adjustment(amount)),
        }
    }

    pub fn elements(&self) -> &[TextArrayElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<TextArrayElement> {
        self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

/// Whether `quad` overlaps `region` with a non-zero area.
fn quads_intersect<E: PolygonEngine + ?Sized>(
    engine: &E,
    quad: &Quad,
    region: &Rectangle,
) -> RedactResult<bool> {
    let mut clipper = Clipper::new(engine);
    clipper
        .add_subject(quad.to_vec())
        .add_clip(region.vertices().to_vec());
    let tree = clipper.execute(ClipOperation::Intersection, FillRule::NonZero, FillRule::NonZero)?;
    Ok(!tree.is_empty())
}

fn intersects_any<E: PolygonEngine + ?Sized>(
    engine: &E,
    quad: &Quad,
    regions: &[Rectangle],
) -> RedactResult<bool> {
    for region in regions {
        if quads_intersect(engine, quad, region)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Redact the glyphs of `run` that overlap any of `regions`.
///
/// A run that overlaps nothing comes back as a single literal holding the
/// run's original bytes.
///
/// # Errors
/// `InvalidTextState` when a glyph must be removed but the font size or the
/// horizontal scaling is zero, which leaves its advance undefined.
pub fn filter_text<E: PolygonEngine + ?Sized>(
    engine: &E,
    regions: &[Rectangle],
    run: &TextRun,
) -> RedactResult<TextArray> {
    let mut array = TextArray::new();

    if !intersects_any(engine, &run.quad(), regions)? {
        array.push_literal(&run.content);
        return Ok(array);
    }

    let scale = run.font_size * run.horizontal_scaling / 100.0;
    let mut removed = 0usize;

    for glyph in &run.glyphs {
        if !intersects_any(engine, &glyph.quad(), regions)? {
            array.push_literal(&glyph.content);
            continue;
        }

        if scale == 0.0 || !scale.is_finite() {
            return Err(RedactError::InvalidTextState(format!(
                "font size {} with horizontal scaling {}% gives no glyph advance",
                run.font_size, run.horizontal_scaling
            )));
        }
        array.push_adjustment(-glyph.unscaled_width * 1000.0 / scale);
        removed += 1;
    }

    debug!("Removed {} of {} glyphs from text run", removed, run.glyphs.len());
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::events::{GlyphInfo, LineSegment};
    use crate::clipper::DefaultEngine;
    use crate::geometry::Point;

    fn glyph(x: f64, width: f64, content: &[u8]) -> GlyphInfo {
        GlyphInfo {
            ascent: LineSegment::new(Point::new(x, 8.0), Point::new(x + width, 8.0)),
            descent: LineSegment::new(Point::new(x, -2.0), Point::new(x + width, -2.0)),
            unscaled_width: width,
            content: content.to_vec(),
        }
    }

    /// Three glyphs `ABC`, 10 units wide each, at font size 10.
    fn run() -> TextRun {
        TextRun {
            ascent: LineSegment::new(Point::new(0.0, 8.0), Point::new(30.0, 8.0)),
            descent: LineSegment::new(Point::new(0.0, -2.0), Point::new(30.0, -2.0)),
            content: b"ABC".to_vec(),
            glyphs: vec![glyph(0.0, 10.0, b"A"), glyph(10.0, 10.0, b"B"), glyph(20.0, 10.0, b"C")],
            font_size: 10.0,
            horizontal_scaling: 100.0,
        }
    }

    #[test]
    fn test_untouched_run_is_kept_whole() {
        let regions = [Rectangle::new(100.0, 100.0, 5.0, 5.0)];
        let array = filter_text(&DefaultEngine, &regions, &run()).unwrap();
        assert_eq!(array.elements(), &[TextArrayElement::Literal(b"ABC".to_vec())]);
    }

    #[test]
    fn test_overlapped_glyph_becomes_adjustment() {
        let regions = [Rectangle::new(12.0, 0.0, 2.0, 2.0)];
        let array = filter_text(&DefaultEngine, &regions, &run()).unwrap();
        assert_eq!(
            array.elements(),
            &[
                TextArrayElement::Literal(b"A".to_vec()),
                TextArrayElement::Adjustment(-1000.0),
                TextArrayElement::Literal(b"C".to_vec()),
            ]
        );
    }

    #[test]
    fn test_adjacent_elements_merge() {
        let regions = [Rectangle::new(5.0, 0.0, 10.0, 2.0)];
        let array = filter_text(&DefaultEngine, &regions, &run()).unwrap();
        assert_eq!(
            array.into_elements(),
            vec![
                TextArrayElement::Adjustment(-2000.0),
                TextArrayElement::Literal(b"C".to_vec()),
            ]
        );
    }

    #[test]
    fn test_horizontal_scaling_enters_adjustment() {
        let mut text = run();
        text.horizontal_scaling = 50.0;
        let regions = [Rectangle::new(0.0, 0.0, 30.0, 2.0)];
        let array = filter_text(&DefaultEngine, &regions, &text).unwrap();
        assert_eq!(array.elements(), &[TextArrayElement::Adjustment(-6000.0)]);
    }

    #[test]
    fn test_touching_edge_does_not_elide() {
        // Shares only the edge x = 10 with glyph A
        let regions = [Rectangle::new(10.0, 0.0, 5.0, 2.0)];
        let mut text = run();
        text.glyphs.truncate(1);
        text.content.truncate(1);
        text.ascent.end = Point::new(10.0, 8.0);
        text.descent.end = Point::new(10.0, -2.0);
        let array = filter_text(&DefaultEngine, &regions, &text).unwrap();
        assert_eq!(array.elements(), &[TextArrayElement::Literal(b"A".to_vec())]);
    }

    #[test]
    fn test_zero_font_size_is_reported() {
        let mut text = run();
        text.font_size = 0.0;
        let regions = [Rectangle::new(0.0, 0.0, 30.0, 2.0)];
        let err = filter_text(&DefaultEngine, &regions, &text).unwrap_err();
        assert!(matches!(err, RedactError::InvalidTextState(_)));
    }

    #[test]
    fn test_rotated_glyph_quad() {
        // A glyph rotated by 45 degrees around the origin; its axis-aligned
        // bounds would reach the region, the quad itself does not
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let rotated = GlyphInfo {
            ascent: LineSegment::new(Point::new(-s, s), Point::new(0.0, 2.0 * s)),
            descent: LineSegment::new(Point::new(0.0, 0.0), Point::new(s, s)),
            unscaled_width: 0.1,
            content: b"X".to_vec(),
        };
        let text = TextRun {
            ascent: rotated.ascent,
            descent: rotated.descent,
            content: b"X".to_vec(),
            glyphs: vec![rotated],
            font_size: 10.0,
            horizontal_scaling: 100.0,
        };
        let regions = [Rectangle::new(0.5, 0.0, 0.2, 0.1)];
        let array = filter_text(&DefaultEngine, &regions, &text).unwrap();
        assert_eq!(array.elements(), &[TextArrayElement::Literal(b"X".to_vec())]);
    }
}
