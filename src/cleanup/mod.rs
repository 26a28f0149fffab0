//! Redaction of render events.
//!
//! - [`dash`] and [`dasher`] turn dashed strokes into explicit dash segments
//! - [`stroke`] converts strokes into fill regions
//! - [`fill`] subtracts regions from fill regions
//! - [`text`] elides glyphs, [`image`] paints over or drops images
//! - [`filter`] ties them together behind [`CleanUpFilter`]

pub mod codec;
pub mod dash;
pub mod dasher;
pub mod events;
pub mod fill;
pub mod filter;
pub mod image;
pub mod stroke;
pub mod text;

pub use codec::{DefaultCodec, ImageCodec, ImageFormat};
pub use dash::{DashArrayElem, DashCursor, DashPattern};
pub use dasher::{DashedPath, apply_dash_pattern};
pub use events::{FillEvent, GlyphInfo, ImageEvent, LineSegment, RenderEvent, StrokeEvent, TextRun};
pub use filter::{CleanUpFilter, FilterOutput};
pub use image::ImageFilterResult;
pub use text::{TextArray, TextArrayElement};
