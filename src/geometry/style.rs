//! Drawing parameters attached to stroke and fill events.
//!
//! These mirror the graphics state entries defined in ISO 32000-1
//! (section 8.4) that influence the painted area of a path.

use smallvec::SmallVec;

use crate::cleanup::dash::DashPattern;

/// Line cap style (ISO 32000-1, 8.4.3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Butt cap (default) - stroke is squared off at the endpoint
    #[default]
    Butt = 0,
    /// Round cap - semicircular arc with center at endpoint
    Round = 1,
    /// Projecting square cap - stroke continues half a line width beyond the endpoint
    ProjectingSquare = 2,
}

impl LineCap {
    /// Map the numeric value of the `J` operator. Unknown values fall back to butt.
    pub fn from_pdf_value(value: i64) -> Self {
        match value {
            1 => LineCap::Round,
            2 => LineCap::ProjectingSquare,
            _ => LineCap::Butt,
        }
    }
}

/// Line join style (ISO 32000-1, 8.4.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Miter join (default) - outer edges meet at a sharp point
    #[default]
    Miter = 0,
    /// Round join - circular arc between the edges
    Round = 1,
    /// Bevel join - outer edges meet at a beveled edge
    Bevel = 2,
}

impl LineJoin {
    /// Map the numeric value of the `j` operator. Unknown values fall back to miter.
    pub fn from_pdf_value(value: i64) -> Self {
        match value {
            1 => LineJoin::Round,
            2 => LineJoin::Bevel,
            _ => LineJoin::Miter,
        }
    }
}

/// Fill rule for path filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Nonzero winding number rule
    #[default]
    NonZero,
    /// Even-odd rule
    EvenOdd,
}

/// Dash lengths in alternating on/off order.
pub type DashArray = SmallVec<[f64; 4]>;

/// Stroke properties of a stroke event.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeProps {
    /// Line width in user space units (default: 1.0)
    pub line_width: f64,

    /// Line cap style (default: Butt)
    pub line_cap: LineCap,

    /// Line join style (default: Miter)
    pub line_join: LineJoin,

    /// Miter limit (default: 10.0)
    /// The maximum ratio of miter length to line width before bevel is used
    pub miter_limit: f64,

    /// Dash pattern, `None` when the graphics state carries no `d` entry
    pub dash: Option<DashPattern>,
}

impl Default for StrokeProps {
    fn default() -> Self {
        StrokeProps {
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            dash: None,
        }
    }
}

impl StrokeProps {
    pub fn new(line_width: f64) -> Self {
        StrokeProps {
            line_width,
            ..Default::default()
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = Some(dash);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_props_default() {
        let props = StrokeProps::default();
        assert_eq!(props.line_width, 1.0);
        assert_eq!(props.line_cap, LineCap::Butt);
        assert_eq!(props.line_join, LineJoin::Miter);
        assert_eq!(props.miter_limit, 10.0);
        assert!(props.dash.is_none());
    }

    #[test]
    fn test_pdf_values() {
        assert_eq!(LineCap::from_pdf_value(1), LineCap::Round);
        assert_eq!(LineCap::from_pdf_value(2), LineCap::ProjectingSquare);
        assert_eq!(LineCap::from_pdf_value(7), LineCap::Butt);
        assert_eq!(LineJoin::from_pdf_value(2), LineJoin::Bevel);
        assert_eq!(LineJoin::from_pdf_value(-1), LineJoin::Miter);
    }
}
