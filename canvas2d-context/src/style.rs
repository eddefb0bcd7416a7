//! Line, text and fill-rule enums for Canvas 2D operations, plus color
//! parsing and serialization.

use crate::error::{Canvas2dError, Canvas2dResult};

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Horizontal text alignment relative to the anchor point.
///
/// `Start` and `End` are treated as left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    /// Handled like `Top`.
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    /// Handled like `Bottom`.
    Ideographic,
    Bottom,
}

/// Winding rule for fill, clip and hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasFillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<CanvasFillRule> for tiny_skia::FillRule {
    fn from(rule: CanvasFillRule) -> Self {
        match rule {
            CanvasFillRule::NonZero => tiny_skia::FillRule::Winding,
            CanvasFillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Parse a fill rule string. Unrecognized strings fall back to nonzero.
pub fn parse_fill_rule(rule: &str) -> CanvasFillRule {
    match rule {
        "nonzero" => CanvasFillRule::NonZero,
        "evenodd" => CanvasFillRule::EvenOdd,
        other => {
            log::warn!(target: "canvas", "unrecognized fill rule {:?}, using nonzero", other);
            CanvasFillRule::NonZero
        }
    }
}

/// Image smoothing quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSmoothingQuality {
    #[default]
    Low,
    Medium,
    High,
}

impl From<ImageSmoothingQuality> for tiny_skia::FilterQuality {
    fn from(quality: ImageSmoothingQuality) -> Self {
        match quality {
            ImageSmoothingQuality::Low | ImageSmoothingQuality::Medium => {
                tiny_skia::FilterQuality::Bilinear
            }
            ImageSmoothingQuality::High => tiny_skia::FilterQuality::Bicubic,
        }
    }
}

/// Parse a CSS color string.
pub(crate) fn parse_color(s: &str) -> Canvas2dResult<tiny_skia::Color> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{}: {}", s, e)))?;
    let [r, g, b, a] = parsed.to_array();
    Ok(tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::BLACK))
}

/// Serialize a color the way canvas getters report it: `#rrggbb` when
/// opaque, `rgba(r, g, b, a)` otherwise.
pub(crate) fn serialize_color(color: tiny_skia::Color) -> String {
    let c = color.to_color_u8();
    if c.alpha() == 255 {
        format!("#{:02x}{:02x}{:02x}", c.red(), c.green(), c.blue())
    } else {
        let alpha = (color.alpha() * 1000.0).round() / 1000.0;
        format!("rgba({}, {}, {}, {})", c.red(), c.green(), c.blue(), alpha)
    }
}
