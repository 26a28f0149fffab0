//! Stroke offsetting backed by `tiny-skia`'s stroker.

use tiny_skia::{
    LineCap as SkiaLineCap, LineJoin as SkiaLineJoin, PathBuilder as SkiaPathBuilder,
    PathSegment, Stroke,
};

use super::{DegenerateSubpath, OffsetResult, OffsetStyle};
use crate::core::error::{RedactError, RedactResult};
use crate::geometry::{LineCap, LineJoin, Path, Point, Segment};

fn skia_cap(cap: LineCap) -> SkiaLineCap {
    match cap {
        LineCap::Butt => SkiaLineCap::Butt,
        LineCap::Round => SkiaLineCap::Round,
        LineCap::ProjectingSquare => SkiaLineCap::Square,
    }
}

fn skia_join(join: LineJoin) -> SkiaLineJoin {
    match join {
        LineJoin::Miter => SkiaLineJoin::Miter,
        LineJoin::Round => SkiaLineJoin::Round,
        LineJoin::Bevel => SkiaLineJoin::Bevel,
    }
}

fn fits_f32(p: Point) -> bool {
    (p.x as f32).is_finite() && (p.y as f32).is_finite()
}

/// Outline the stroke of `path`.
///
/// Degenerate subpaths are withheld from the stroker and reported instead, so
/// the caller decides how their caps are drawn. A negative or non-finite
/// width and coordinates outside the `f32` range are rejected with
/// [`RedactError::Engine`].
pub fn stroke_outline(path: &Path, style: &OffsetStyle) -> RedactResult<OffsetResult> {
    if !(style.width >= 0.0 && (style.width as f32).is_finite()) {
        return Err(RedactError::engine(format!(
            "cannot outline a stroke of width {}",
            style.width
        )));
    }

    let mut degenerate = Vec::new();
    let mut builder = SkiaPathBuilder::new();

    for (index, subpath) in path.subpaths().iter().enumerate() {
        if subpath.is_single_point() {
            continue;
        }
        if subpath.is_degenerate() {
            degenerate.push(DegenerateSubpath {
                index,
                point: subpath.start_point(),
            });
            continue;
        }

        let start = subpath.start_point();
        let outside = std::iter::once(start)
            .chain(subpath.segments().iter().flat_map(|segment| match *segment {
                Segment::Line(_, p) => [p, p, p],
                Segment::Cubic(_, c1, c2, p) => [c1, c2, p],
            }))
            .find(|&p| !fits_f32(p));
        if let Some(p) = outside {
            return Err(RedactError::engine(format!(
                "subpath {index} has coordinate ({}, {}) outside the stroker's range",
                p.x, p.y
            )));
        }

        builder.move_to(start.x as f32, start.y as f32);
        for segment in subpath.segments() {
            match *segment {
                Segment::Line(_, p) => builder.line_to(p.x as f32, p.y as f32),
                Segment::Cubic(_, c1, c2, p) => builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    p.x as f32,
                    p.y as f32,
                ),
            }
        }
        if subpath.is_closed() {
            builder.close();
        }
    }

    let mut outline = Path::new();

    // `finish` refuses paths without area-spanning points; nothing to paint then.
    if let Some(skia_path) = builder.finish() {
        let stroke = Stroke {
            width: style.width as f32,
            miter_limit: style.miter_limit as f32,
            line_cap: skia_cap(style.cap),
            line_join: skia_join(style.join),
            ..Stroke::default()
        };

        if let Some(stroked) = skia_path.stroke(&stroke, style.resolution_scale) {
            append_skia_path(&stroked, &mut outline);
        }
    }

    Ok(OffsetResult {
        outline,
        degenerate,
    })
}

/// Copy a tiny-skia path into `out`, raising quadratic segments to cubics.
fn append_skia_path(skia_path: &tiny_skia::Path, out: &mut Path) {
    let mut last = Point::default();

    for segment in skia_path.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                last = Point::new(p.x as f64, p.y as f64);
                out.move_to(last.x, last.y);
            }
            PathSegment::LineTo(p) => {
                last = Point::new(p.x as f64, p.y as f64);
                out.line_to(last.x, last.y);
            }
            PathSegment::QuadTo(q, p) => {
                let q = Point::new(q.x as f64, q.y as f64);
                let end = Point::new(p.x as f64, p.y as f64);
                let c1 = last + (q - last) * (2.0 / 3.0);
                let c2 = end + (q - end) * (2.0 / 3.0);
                out.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                last = end;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                last = Point::new(p.x as f64, p.y as f64);
                out.curve_to(
                    c1.x as f64,
                    c1.y as f64,
                    c2.x as f64,
                    c2.y as f64,
                    last.x,
                    last.y,
                );
            }
            PathSegment::Close => {
                out.close_path();
                if let Some(p) = out.current_point() {
                    last = p;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(width: f64, cap: LineCap) -> OffsetStyle {
        OffsetStyle {
            width,
            cap,
            join: LineJoin::Miter,
            miter_limit: 10.0,
            resolution_scale: 1.0,
        }
    }

    #[test]
    fn test_butt_line_outline_bounds() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);

        let result = stroke_outline(&path, &style(2.0, LineCap::Butt)).unwrap();
        assert!(result.degenerate.is_empty());
        let (x0, y0, x1, y1) = result.outline.bounding_box().unwrap();
        assert!((x0 - 0.0).abs() < 1e-4 && (x1 - 10.0).abs() < 1e-4);
        assert!((y0 + 1.0).abs() < 1e-4 && (y1 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_width_is_rejected() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);

        for width in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                stroke_outline(&path, &style(width, LineCap::Butt)),
                Err(RedactError::Engine(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(f64::NAN, 5.0);
        assert!(matches!(
            stroke_outline(&path, &style(1.0, LineCap::Butt)),
            Err(RedactError::Engine(_))
        ));

        let mut huge = Path::new();
        huge.move_to(0.0, 0.0);
        huge.line_to(1e40, 0.0);
        assert!(matches!(
            stroke_outline(&huge, &style(1.0, LineCap::Butt)),
            Err(RedactError::Engine(_))
        ));
    }

    #[test]
    fn test_square_cap_extends_line() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);

        let result = stroke_outline(&path, &style(2.0, LineCap::ProjectingSquare)).unwrap();
        let (x0, _, x1, _) = result.outline.bounding_box().unwrap();
        assert!((x0 + 1.0).abs() < 1e-4 && (x1 - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_subpaths_are_reported() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.move_to(20.0, 5.0);
        path.line_to(20.0, 5.0);

        let result = stroke_outline(&path, &style(2.0, LineCap::Round)).unwrap();
        assert_eq!(
            result.degenerate,
            vec![DegenerateSubpath {
                index: 1,
                point: Point::new(20.0, 5.0)
            }]
        );
        let (_, _, x1, _) = result.outline.bounding_box().unwrap();
        assert!(x1 < 12.0);
    }

    #[test]
    fn test_only_degenerate_input_gives_empty_outline() {
        let mut path = Path::new();
        path.move_to(3.0, 3.0);
        path.line_to(3.0, 3.0);

        let result = stroke_outline(&path, &style(1.0, LineCap::Butt)).unwrap();
        assert!(result.outline.is_empty());
        assert_eq!(result.degenerate.len(), 1);
    }
}
