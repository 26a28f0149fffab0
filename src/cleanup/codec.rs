//! Raster codec seam.
//!
//! The image redactor only needs to turn encoded bytes into pixels and back.
//! [`ImageCodec`] is that contract; [`DefaultCodec`] implements it with the
//! `image` crate.
//!
//! Re-encoding follows the quality policy of the clean-up filter: lossy
//! formats are written at maximum quality, lossless formats with their best
//! compression.

use std::io::Cursor;

use ::image::codecs::jpeg::JpegEncoder;
use ::image::codecs::png::{CompressionType, FilterType, PngEncoder};
use ::image::{ColorType, DynamicImage, ImageEncoder};
use tiff::encoder::compression::Lzw;
use tiff::encoder::{TiffEncoder, colortype};

use crate::core::config::CleanUpConfig;
use crate::core::error::{RedactError, RedactResult};

/// Encodings an image event can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// JPEG (DCTDecode)
    Jpeg,
    Png,
    Tiff,
    Gif,
    Bmp,
    /// Not declared; detected from the data
    Unknown,
}

impl ImageFormat {
    /// Detect image format from header bytes
    pub fn from_header(header: &[u8]) -> Self {
        if header.len() < 4 {
            return ImageFormat::Unknown;
        }

        // JPEG signature: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return ImageFormat::Jpeg;
        }

        // PNG signature: 89 50 4E 47
        if header.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return ImageFormat::Png;
        }

        // TIFF, little or big endian: "II*\0" / "MM\0*"
        if header.starts_with(b"II*\0") || header.starts_with(b"MM\0*") {
            return ImageFormat::Tiff;
        }

        if header.starts_with(b"GIF8") {
            return ImageFormat::Gif;
        }

        if header.starts_with(b"BM") {
            return ImageFormat::Bmp;
        }

        ImageFormat::Unknown
    }

    /// The declared format, or the sniffed one when nothing was declared.
    pub fn resolve(self, data: &[u8]) -> Self {
        match self {
            ImageFormat::Unknown => ImageFormat::from_header(data),
            known => known,
        }
    }

    fn as_image_format(self) -> Option<::image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(::image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(::image::ImageFormat::Png),
            ImageFormat::Tiff => Some(::image::ImageFormat::Tiff),
            ImageFormat::Gif => Some(::image::ImageFormat::Gif),
            ImageFormat::Bmp => Some(::image::ImageFormat::Bmp),
            ImageFormat::Unknown => None,
        }
    }
}

/// Decoding and encoding of raster images.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, data: &[u8], format: ImageFormat) -> RedactResult<DynamicImage>;

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        config: &CleanUpConfig,
    ) -> RedactResult<Vec<u8>>;
}

/// Codec backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec;

impl DefaultCodec {
    fn encode_jpeg(image: &DynamicImage, quality: u8) -> RedactResult<Vec<u8>> {
        // The JPEG encoder has no alpha channel
        let image = match image.color() {
            ColorType::L8 | ColorType::Rgb8 => image.clone(),
            ColorType::L16 | ColorType::La8 | ColorType::La16 => {
                DynamicImage::ImageLuma8(image.to_luma8())
            }
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        };

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .write_image(
                image.as_bytes(),
                image.width(),
                image.height(),
                image.color().into(),
            )
            .map_err(|e| RedactError::codec(ImageFormat::Jpeg, e))?;
        Ok(buf)
    }

    fn encode_png(image: &DynamicImage) -> RedactResult<Vec<u8>> {
        let mut buf = Vec::new();
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive)
            .write_image(
                image.as_bytes(),
                image.width(),
                image.height(),
                image.color().into(),
            )
            .map_err(|e| RedactError::codec(ImageFormat::Png, e))?;
        Ok(buf)
    }

    /// Write `image` LZW compressed. Colour types without a TIFF
    /// counterpart are widened to 8-bit RGBA.
    fn encode_tiff(image: &DynamicImage) -> RedactResult<Vec<u8>> {
        let codec_error = |e: tiff::TiffError| RedactError::codec(ImageFormat::Tiff, e);
        let (width, height) = (image.width(), image.height());

        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buf).map_err(codec_error)?;
            match image {
                DynamicImage::ImageLuma8(img) => encoder
                    .write_image_with_compression::<colortype::Gray8, _>(
                        width,
                        height,
                        Lzw,
                        img.as_raw(),
                    ),
                DynamicImage::ImageLuma16(img) => encoder
                    .write_image_with_compression::<colortype::Gray16, _>(
                        width,
                        height,
                        Lzw,
                        img.as_raw(),
                    ),
                DynamicImage::ImageRgb8(img) => encoder
                    .write_image_with_compression::<colortype::RGB8, _>(
                        width,
                        height,
                        Lzw,
                        img.as_raw(),
                    ),
                DynamicImage::ImageRgb16(img) => encoder
                    .write_image_with_compression::<colortype::RGB16, _>(
                        width,
                        height,
                        Lzw,
                        img.as_raw(),
                    ),
                DynamicImage::ImageRgba8(img) => encoder
                    .write_image_with_compression::<colortype::RGBA8, _>(
                        width,
                        height,
                        Lzw,
                        img.as_raw(),
                    ),
                DynamicImage::ImageRgba16(img) => encoder
                    .write_image_with_compression::<colortype::RGBA16, _>(
                        width,
                        height,
                        Lzw,
                        img.as_raw(),
                    ),
                other => {
                    let rgba = other.to_rgba8();
                    encoder.write_image_with_compression::<colortype::RGBA8, _>(
                        width,
                        height,
                        Lzw,
                        rgba.as_raw(),
                    )
                }
            }
            .map_err(codec_error)?;
        }

        Ok(buf.into_inner())
    }
}

impl ImageCodec for DefaultCodec {
    fn decode(&self, data: &[u8], format: ImageFormat) -> RedactResult<DynamicImage> {
        let target = format
            .as_image_format()
            .ok_or(RedactError::UnsupportedImageFormat { format })?;
        ::image::load_from_memory_with_format(data, target)
            .map_err(|e| RedactError::codec(format, e))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        config: &CleanUpConfig,
    ) -> RedactResult<Vec<u8>> {
        match format {
            ImageFormat::Jpeg => Self::encode_jpeg(image, config.jpeg_quality),
            ImageFormat::Png => Self::encode_png(image),
            ImageFormat::Tiff => Self::encode_tiff(image),
            ImageFormat::Gif | ImageFormat::Bmp => {
                let target = format
                    .as_image_format()
                    .ok_or(RedactError::UnsupportedImageFormat { format })?;
                let mut buf = Vec::new();
                image
                    .write_to(&mut Cursor::new(&mut buf), target)
                    .map_err(|e| RedactError::codec(format, e))?;
                Ok(buf)
            }
            ImageFormat::Unknown => Err(RedactError::UnsupportedImageFormat { format }),
        }
    }
}
