use thiserror::Error;

use crate::cleanup::codec::ImageFormat;
use crate::geometry::Matrix;

/// Universal error type for redaction operations.
///
/// Every variant is local to the single render event that produced it. A
/// failing stroke, fill, text run or image never poisons the filter, so the
/// caller can report "cannot redact this element" and move on to the next
/// event.
#[derive(Debug, Clone, Error)]
pub enum RedactError {
    /// A placement or CTM matrix has no inverse
    #[error("Transform {matrix} is not invertible")]
    NonInvertibleTransform { matrix: Matrix },

    /// The image codec failed to decode or encode
    #[error("{format:?} codec error: {message}")]
    Codec { format: ImageFormat, message: String },

    /// Image format could not be determined or has no encoder
    #[error("Unsupported image format: {format:?}")]
    UnsupportedImageFormat { format: ImageFormat },

    /// Square cap reconstruction found no path segment through a degenerate point
    #[error("No path segment passes through degenerate point ({x}, {y})")]
    CapDirectionNotFound { x: f64, y: f64 },

    /// Text state would produce a non-finite spacing adjustment
    #[error("Invalid text state: {0}")]
    InvalidTextState(String),

    /// The polygon engine rejected its input
    #[error("Polygon engine error: {0}")]
    Engine(String),
}

impl RedactError {
    /// Wrap a codec failure for the given format.
    pub fn codec(format: ImageFormat, err: impl std::fmt::Display) -> Self {
        RedactError::Codec {
            format,
            message: err.to_string(),
        }
    }

    /// Create a polygon engine error.
    pub fn engine(message: impl Into<String>) -> Self {
        RedactError::Engine(message.into())
    }

    /// Whether the failure came from the image codec collaborator.
    pub fn is_codec_failure(&self) -> bool {
        matches!(
            self,
            RedactError::Codec { .. } | RedactError::UnsupportedImageFormat { .. }
        )
    }
}

/// Result type alias for redaction operations
pub type RedactResult<T> = Result<T, RedactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_invertible_display() {
        let err = RedactError::NonInvertibleTransform {
            matrix: Matrix::new(0.0, 0.0, 0.0, 0.0, 1.0, 2.0),
        };
        assert_eq!(err.to_string(), "Transform [0 0 0 0 1 2] is not invertible");
        assert!(!err.is_codec_failure());
    }

    #[test]
    fn test_codec_helper() {
        let err = RedactError::codec(ImageFormat::Png, "truncated stream");
        assert!(err.is_codec_failure());
        assert_eq!(err.to_string(), "Png codec error: truncated stream");
    }
}
