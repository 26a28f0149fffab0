//! Tunable parameters of the clean-up filter.
//!
//! Every numeric tolerance used by the geometry code lives here so that the
//! values are named once and can be overridden per filter instance.

/// Control point offset of a quarter-circle cubic, as a fraction of the radius.
pub const CIRCLE_APPROXIMATION_CONST: f64 = 0.55191502449;

/// Maximum residual `|a*x + b*y + c|` of a line equation at which a point
/// counts as lying on the line. The coefficients are not normalized, so the
/// residual grows with the length of the segment defining the line.
pub const DEFAULT_POINT_ON_LINE_TOLERANCE: f64 = 0.1;

/// Maximum deviation allowed when flattening Bezier curves.
pub const DEFAULT_CURVE_FLATNESS: f64 = 0.025;

/// Dash cycles shorter than this cannot advance along a path in bounded time
/// and are stroked as solid lines.
pub const MIN_DASH_CYCLE_LENGTH: f64 = 1e-6;

/// Upper bound on the dash and gap elements one path may expand into.
/// Patterns that would need more are stroked as solid lines.
pub const MAX_DASH_ELEMENTS: f64 = 1e6;

/// Opaque white.
pub const DEFAULT_FILL_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Filter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanUpConfig {
    /// RGBA paint used for cleaned image areas (alpha is expected to be 255)
    pub fill_color: [u8; 4],

    /// Maximum line equation residual accepted by square cap reconstruction
    /// when walking the source path
    pub point_on_line_tolerance: f64,

    /// Flatness used for all curve approximations
    pub curve_flatness: f64,

    /// Resolution scale forwarded to the stroker (higher means finer outlines)
    pub stroke_resolution_scale: f32,

    /// Quality used when re-encoding JPEG images (1-100)
    pub jpeg_quality: u8,
}

impl Default for CleanUpConfig {
    fn default() -> Self {
        CleanUpConfig {
            fill_color: DEFAULT_FILL_COLOR,
            point_on_line_tolerance: DEFAULT_POINT_ON_LINE_TOLERANCE,
            curve_flatness: DEFAULT_CURVE_FLATNESS,
            stroke_resolution_scale: 1.0,
            jpeg_quality: 100,
        }
    }
}

impl CleanUpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_color(mut self, color: [u8; 4]) -> Self {
        self.fill_color = color;
        self
    }

    pub fn with_point_on_line_tolerance(mut self, tolerance: f64) -> Self {
        self.point_on_line_tolerance = tolerance;
        self
    }

    pub fn with_curve_flatness(mut self, flatness: f64) -> Self {
        self.curve_flatness = flatness;
        self
    }

    pub fn with_stroke_resolution_scale(mut self, scale: f32) -> Self {
        self.stroke_resolution_scale = scale;
        self
    }

    /// Set the JPEG quality, clamped to the encoder's 1-100 range.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}
