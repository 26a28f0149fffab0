//! Subtraction of redaction regions from filled paths.

use crate::clipper::{ClipOperation, Clipper, PolyType, PolygonEngine};
use crate::core::error::RedactResult;
use crate::geometry::{FillRule, Matrix, Path, Rectangle};

/// Remove `regions` from the area that filling `path` with `fill_rule` paints.
///
/// The regions are given in device space and are brought into the path's
/// space through the inverse of `ctm`. Open subpaths are closed first since
/// only closed contours enclose an area. Regions are always combined with the
/// nonzero rule.
///
/// # Errors
/// `NonInvertibleTransform` when `ctm` has no inverse.
pub fn filter_fill_path<E: PolygonEngine + ?Sized>(
    engine: &E,
    regions: &[Rectangle],
    path: &Path,
    ctm: &Matrix,
    fill_rule: FillRule,
    flatness: f64,
) -> RedactResult<Path> {
    let mut subject = path.clone();
    subject.close_all_subpaths();

    let to_user_space = ctm.invert()?;
    let mut clipper = Clipper::new(engine);
    clipper.add_path(&subject, flatness, PolyType::Subject);
    for region in regions {
        clipper.add_clip(to_user_space.transform_points(&region.vertices()));
    }

    let tree = clipper.execute(ClipOperation::Difference, fill_rule, FillRule::NonZero)?;
    Ok(tree.to_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::DefaultEngine;
    use crate::core::error::RedactError;

    fn square_path(x: f64, y: f64, size: f64) -> Path {
        let mut path = Path::new();
        path.rect(x, y, size, size);
        path
    }

    fn filter(regions: &[Rectangle], path: &Path, ctm: &Matrix) -> Path {
        filter_fill_path(&DefaultEngine, regions, path, ctm, FillRule::NonZero, 0.025).unwrap()
    }

    fn area(path: &Path) -> f64 {
        path.subpaths()
            .iter()
            .map(|subpath| {
                let ring = subpath.piecewise_linear_approximation(0.025);
                let n = ring.len();
                let twice: f64 = (0..n)
                    .map(|i| {
                        let (a, b) = (ring[i], ring[(i + 1) % n]);
                        a.x * b.y - b.x * a.y
                    })
                    .sum();
                twice.abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_explicitly_closed_square_keeps_its_area() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.line_to(0.0, 10.0);
        path.line_to(0.0, 0.0);
        path.close_path();

        let result = filter(&[], &path, &Matrix::identity());
        assert_eq!(result.len(), 1);
        assert!((area(&result) - 100.0).abs() < 1e-6);

        let regions = [Rectangle::new(5.0, -1.0, 10.0, 12.0)];
        let result = filter(&regions, &path, &Matrix::identity());
        assert!((area(&result) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_covering_region_empties_path() {
        let regions = [Rectangle::new(-1.0, -1.0, 12.0, 12.0)];
        let result = filter(&regions, &square_path(0.0, 0.0, 10.0), &Matrix::identity());
        assert!(result.is_empty());
    }

    #[test]
    fn test_disjoint_region_keeps_path() {
        let regions = [Rectangle::new(50.0, 50.0, 5.0, 5.0)];
        let result = filter(&regions, &square_path(0.0, 0.0, 10.0), &Matrix::identity());
        assert_eq!(result.len(), 1);
        let (x0, y0, x1, y1) = result.bounding_box().unwrap();
        assert!(x0.abs() < 1e-4 && y0.abs() < 1e-4);
        assert!((x1 - 10.0).abs() < 1e-4 && (y1 - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_regions_are_mapped_into_user_space() {
        // Device space is user space scaled by 2, so the device region
        // [0, 10] covers user [0, 5]
        let ctm = Matrix::scale(2.0, 2.0);
        let regions = [Rectangle::new(0.0, 0.0, 10.0, 20.0)];
        let result = filter(&regions, &square_path(0.0, 0.0, 10.0), &ctm);
        let (x0, y0, x1, y1) = result.bounding_box().unwrap();
        assert!((x0 - 5.0).abs() < 1e-4);
        assert!((x1 - 10.0).abs() < 1e-4);
        assert!(y0.abs() < 1e-4 && (y1 - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_open_subpath_is_closed_before_clipping() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);

        let result = filter(&[], &path, &Matrix::identity());
        assert_eq!(result.len(), 1);
        assert!(result.subpaths()[0].is_closed());
    }

    #[test]
    fn test_even_odd_keeps_hole() {
        let mut path = square_path(0.0, 0.0, 10.0);
        path.rect(3.0, 3.0, 4.0, 4.0);
        let result = filter_fill_path(
            &DefaultEngine,
            &[],
            &path,
            &Matrix::identity(),
            FillRule::EvenOdd,
            0.025,
        )
        .unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_singular_ctm_is_reported() {
        let ctm = Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        let err = filter_fill_path(
            &DefaultEngine,
            &[],
            &square_path(0.0, 0.0, 1.0),
            &ctm,
            FillRule::NonZero,
            0.025,
        )
        .unwrap_err();
        assert!(matches!(err, RedactError::NonInvertibleTransform { .. }));
    }
}
