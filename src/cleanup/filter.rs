//! The per-page clean-up filter.

use log::debug;

use super::codec::{DefaultCodec, ImageCodec};
use super::events::{FillEvent, ImageEvent, RenderEvent, StrokeEvent, TextRun};
use super::image::{self, ImageFilterResult};
use super::text::{self, TextArray};
use super::{fill, stroke};
use crate::clipper::{DefaultEngine, PolygonEngine};
use crate::core::config::CleanUpConfig;
use crate::core::error::RedactResult;
use crate::geometry::{Path, Rectangle};

/// Result of filtering one render event.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutput<'a> {
    /// Region left to fill; stroke events come back as nonzero fills
    Path(Path),
    Text(TextArray),
    Image(ImageFilterResult<'a>),
}

/// Removes content lying in a fixed set of device space regions.
///
/// A filter is bound to one page (or content stream). It keeps no state
/// between calls, so one instance may serve events from several threads.
/// Every method fails for its own event only; after an error the filter can
/// be used for the next event as before.
#[derive(Debug, Clone)]
pub struct CleanUpFilter<E = DefaultEngine, C = DefaultCodec> {
    regions: Vec<Rectangle>,
    config: CleanUpConfig,
    engine: E,
    codec: C,
}

impl CleanUpFilter {
    /// Create a filter with the default engine, codec and configuration.
    pub fn new(regions: Vec<Rectangle>) -> Self {
        Self::with_config(regions, CleanUpConfig::default())
    }

    pub fn with_config(regions: Vec<Rectangle>, config: CleanUpConfig) -> Self {
        CleanUpFilter::with_parts(regions, config, DefaultEngine, DefaultCodec)
    }
}

impl<E: PolygonEngine, C: ImageCodec> CleanUpFilter<E, C> {
    /// Create a filter with a custom polygon engine and image codec.
    pub fn with_parts(regions: Vec<Rectangle>, config: CleanUpConfig, engine: E, codec: C) -> Self {
        CleanUpFilter {
            regions,
            config,
            engine,
            codec,
        }
    }

    pub fn regions(&self) -> &[Rectangle] {
        &self.regions
    }

    pub fn config(&self) -> &CleanUpConfig {
        &self.config
    }

    /// Region painted by a stroke minus the redaction regions, to be filled
    /// with the nonzero rule in the stroke's user space.
    pub fn filter_stroke_path(&self, event: &StrokeEvent) -> RedactResult<Path> {
        stroke::filter_stroke_path(
            &self.engine,
            &self.regions,
            &event.path,
            &event.ctm,
            &event.props,
            &self.config,
        )
    }

    /// Region painted by a fill minus the redaction regions, to be filled
    /// with the event's fill rule.
    pub fn filter_fill_path(&self, event: &FillEvent) -> RedactResult<Path> {
        fill::filter_fill_path(
            &self.engine,
            &self.regions,
            &event.path,
            &event.ctm,
            event.fill_rule,
            self.config.curve_flatness,
        )
    }

    /// Replacement `TJ` array for a text run.
    pub fn filter_text(&self, run: &TextRun) -> RedactResult<TextArray> {
        text::filter_text(&self.engine, &self.regions, run)
    }

    /// Replacement for an image, or the signal to drop it.
    pub fn filter_image<'a>(&self, event: &ImageEvent<'a>) -> RedactResult<ImageFilterResult<'a>> {
        image::filter_image(&self.codec, &self.regions, event, &self.config)
    }

    /// Dispatch an event to the matching filter method.
    pub fn filter_event<'a>(&self, event: &RenderEvent<'a>) -> RedactResult<FilterOutput<'a>> {
        let output = match event {
            RenderEvent::Stroke(stroke) => FilterOutput::Path(self.filter_stroke_path(stroke)?),
            RenderEvent::Fill(fill) => FilterOutput::Path(self.filter_fill_path(fill)?),
            RenderEvent::Text(run) => FilterOutput::Text(self.filter_text(run)?),
            RenderEvent::Image(image) => FilterOutput::Image(self.filter_image(image)?),
        };
        debug!("Filtered {} event", event_kind(event));
        Ok(output)
    }
}

fn event_kind(event: &RenderEvent<'_>) -> &'static str {
    match event {
        RenderEvent::Stroke(_) => "stroke",
        RenderEvent::Fill(_) => "fill",
        RenderEvent::Text(_) => "text",
        RenderEvent::Image(_) => "image",
    }
}
