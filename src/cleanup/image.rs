//! Image redaction.
//!
//! Regions are intersected with the image's placement in device space and the
//! overlaps are mapped back into the image's unit square. There they are
//! painted over pixel by pixel; an image covered completely is dropped
//! instead.

use std::borrow::Cow;

use ::image::{DynamicImage, GenericImage, GenericImageView, Rgba};
use log::debug;

use super::codec::ImageCodec;
use super::events::ImageEvent;
use crate::core::config::CleanUpConfig;
use crate::core::error::RedactResult;
use crate::geometry::{Matrix, Rectangle};

/// The image space every image is painted from.
const UNIT_SQUARE: Rectangle = Rectangle::new(0.0, 0.0, 1.0, 1.0);

/// What to do with an image after redaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageFilterResult<'a> {
    /// The image is entirely covered and must not be painted
    Remove,
    /// Image bytes to paint; borrowed when nothing had to change
    Bytes(Cow<'a, [u8]>),
}

/// Parts of an image covered by regions.
#[derive(Debug, Clone, PartialEq)]
pub enum CoveredAreas {
    /// A single region covers the whole placement
    Full,
    /// Covered rectangles in the image's unit square; may be empty
    Partial(Vec<Rectangle>),
}

/// Locate the parts of the image placed by `ctm` that `regions` cover.
///
/// # Errors
/// `NonInvertibleTransform` when `ctm` cannot map device space back into the
/// unit square.
pub fn covered_areas(regions: &[Rectangle], ctm: &Matrix) -> RedactResult<CoveredAreas> {
    let to_image_space = ctm.invert()?;
    let placement = UNIT_SQUARE.transformed_bounds(ctm);
    let mut areas = Vec::new();

    for region in regions {
        let Some(overlap) = placement.intersection(region) else {
            continue;
        };
        if overlap == placement {
            return Ok(CoveredAreas::Full);
        }
        areas.push(overlap.transformed_bounds(&to_image_space));
    }

    Ok(CoveredAreas::Partial(areas))
}

/// Pixel bounds `(x0, y0, x1, y1)` of a unit square rectangle, half-open and
/// clipped to the image. Row 0 is the top of the image.
///
/// Only pixels lying entirely inside the rectangle are included.
fn pixel_bounds(area: &Rectangle, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (f64::from(width), f64::from(height));

    let scaled_bottom = (area.bottom * h).ceil();
    let scaled_top = (area.top() * h).floor();
    let x = (area.left * w).ceil();
    let y = h - scaled_top;
    let rect_width = (area.right() * w).floor() - x;
    let rect_height = scaled_top - scaled_bottom;

    let x0 = x.max(0.0);
    let y0 = y.max(0.0);
    let x1 = (x + rect_width).min(w);
    let y1 = (y + rect_height).min(h);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Paint every area with `color`, leaving all other pixels untouched.
pub fn clean_image(image: &mut DynamicImage, areas: &[Rectangle], color: [u8; 4]) {
    let (width, height) = image.dimensions();

    for area in areas {
        let Some((x0, y0, x1, y1)) = pixel_bounds(area, width, height) else {
            continue;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Rgba(color));
            }
        }
    }
}

/// Redact an image event.
///
/// Bytes are decoded and re-encoded only when some region overlaps the image
/// partially; the re-encoded image keeps the event's format.
pub fn filter_image<'a, C: ImageCodec + ?Sized>(
    codec: &C,
    regions: &[Rectangle],
    event: &ImageEvent<'a>,
    config: &CleanUpConfig,
) -> RedactResult<ImageFilterResult<'a>> {
    let areas = match covered_areas(regions, &event.ctm)? {
        CoveredAreas::Full => {
            debug!("Image placed at {} is fully covered, removing it", event.ctm);
            return Ok(ImageFilterResult::Remove);
        }
        CoveredAreas::Partial(areas) => areas,
    };

    if areas.is_empty() {
        return Ok(ImageFilterResult::Bytes(Cow::Borrowed(event.data)));
    }

    let format = event.format.resolve(event.data);
    let mut image = codec.decode(event.data, format)?;
    clean_image(&mut image, &areas, config.fill_color);
    debug!("Painted {} areas of a {:?} image", areas.len(), format);

    let bytes = codec.encode(&image, format, config)?;
    Ok(ImageFilterResult::Bytes(Cow::Owned(bytes)))
}
