//! Text shaping into glyph outlines, and metrics derived from it.

use crate::font_parser::ParsedFont;
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, SwashCache,
};
use tiny_skia::{Path, PathBuilder, Transform};

/// Result of `measureText`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub actual_bounding_box_left: f32,
    pub actual_bounding_box_right: f32,
    pub font_bounding_box_ascent: f32,
    pub font_bounding_box_descent: f32,
    pub actual_bounding_box_ascent: f32,
    pub actual_bounding_box_descent: f32,
    pub em_height_ascent: f32,
    pub em_height_descent: f32,
    pub hanging_baseline: f32,
    pub alphabetic_baseline: f32,
    pub ideographic_baseline: f32,
}

/// Shaped text with its baseline origin at `(0, 0)`.
#[derive(Debug, Clone, Default)]
pub(crate) struct PreparedText {
    /// Glyph outlines, already scaled to fit any max width.
    pub path: Option<Path>,
    pub width: f32,
    pub height: f32,
    /// Distance from the top of the box down to the baseline.
    pub baseline: f32,
}

/// Owns the font system and glyph cache used to shape text.
pub(crate) struct TextShaper {
    font_system: FontSystem,
    swash_cache: SwashCache,
    hinting_enabled: bool,
}

impl TextShaper {
    pub(crate) fn new(db: fontdb::Database, hinting_enabled: bool) -> Self {
        Self {
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), db),
            swash_cache: SwashCache::new(),
            hinting_enabled,
        }
    }

    /// Shape `text` with `font`.
    ///
    /// A `max_width` that is zero, negative or NaN yields an empty result.
    /// Text wider than `max_width` is compressed horizontally to fit.
    pub(crate) fn prepare(
        &mut self,
        text: &str,
        font: &ParsedFont,
        max_width: Option<f32>,
    ) -> PreparedText {
        if let Some(max) = max_width {
            if max.is_nan() || max <= 0.0 {
                return PreparedText::default();
            }
        }
        let text = normalize_whitespace(text);

        let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let flags = if self.hinting_enabled {
            CacheKeyFlags::empty()
        } else {
            CacheKeyFlags::DISABLE_HINTING
        };
        let attrs = Attrs::new()
            .family(family_for(font.families.first().map(String::as_str)))
            .weight(font.weight)
            .style(font.style)
            .cache_key_flags(flags);
        buffer.set_text(&mut self.font_system, &text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut builder = PathBuilder::new();
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        let mut baseline = None;
        for run in buffer.layout_runs() {
            width += run.line_w;
            baseline.get_or_insert(run.line_y - run.line_top);
            for glyph in run.glyphs.iter() {
                height = height.max(glyph.font_size);
                let origin_x = glyph.x + glyph.font_size * glyph.x_offset;
                let origin_y = glyph.y - glyph.font_size * glyph.y_offset;
                let cache_key = glyph.physical((0.0, 0.0), 1.0).cache_key;
                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, cache_key)
                else {
                    continue;
                };
                // Outlines are y-up.
                for cmd in commands.iter() {
                    match *cmd {
                        Command::MoveTo(p) => builder.move_to(origin_x + p.x, origin_y - p.y),
                        Command::LineTo(p) => builder.line_to(origin_x + p.x, origin_y - p.y),
                        Command::QuadTo(c, p) => builder.quad_to(
                            origin_x + c.x,
                            origin_y - c.y,
                            origin_x + p.x,
                            origin_y - p.y,
                        ),
                        Command::CurveTo(c1, c2, p) => builder.cubic_to(
                            origin_x + c1.x,
                            origin_y - c1.y,
                            origin_x + c2.x,
                            origin_y - c2.y,
                            origin_x + p.x,
                            origin_y - p.y,
                        ),
                        Command::Close => builder.close(),
                    }
                }
            }
        }

        let scale_x = fit_scale(width, max_width);
        let path = builder
            .finish()
            .and_then(|p| p.transform(Transform::from_scale(scale_x, 1.0)));
        let baseline = match baseline {
            Some(b) if b > 0.0 => b,
            _ => font.size_px * 0.8,
        };
        PreparedText {
            path,
            width: width * scale_x,
            height,
            baseline,
        }
    }
}

/// Horizontal compression needed for `width` to fit in `max_width`.
pub(crate) fn fit_scale(width: f32, max_width: Option<f32>) -> f32 {
    match max_width {
        Some(max) if max.is_finite() && width > max && width > 0.0 => max / width,
        _ => 1.0,
    }
}

fn family_for(name: Option<&str>) -> Family<'_> {
    match name {
        None | Some("sans-serif") | Some("system-ui") => Family::SansSerif,
        Some("serif") => Family::Serif,
        Some("monospace") => Family::Monospace,
        Some("cursive") => Family::Cursive,
        Some("fantasy") => Family::Fantasy,
        Some(other) => Family::Name(other),
    }
}

/// Replace each ASCII whitespace character with a plain space.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_whitespace() { ' ' } else { c })
        .collect()
}

/// Horizontal shift of the text box relative to the anchor.
pub(crate) fn align_offset(width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Start | TextAlign::Left => 0.0,
        TextAlign::Center => -width / 2.0,
        TextAlign::End | TextAlign::Right => -width,
    }
}

/// Vertical shift of the baseline relative to the anchor.
pub(crate) fn baseline_offset(font_size: f32, baseline: TextBaseline) -> f32 {
    match baseline {
        TextBaseline::Top | TextBaseline::Hanging => font_size,
        TextBaseline::Middle => font_size / 2.0,
        TextBaseline::Alphabetic | TextBaseline::Ideographic | TextBaseline::Bottom => 0.0,
    }
}

/// Placement of prepared text anchored at `(x, y)`, in user space.
pub(crate) fn placement(
    prepared: &PreparedText,
    x: f32,
    y: f32,
    font_size: f32,
    align: TextAlign,
    baseline: TextBaseline,
) -> Transform {
    Transform::from_translate(x, y)
        .pre_translate(0.0, baseline_offset(font_size, baseline))
        .pre_translate(align_offset(prepared.width, align), 0.0)
}

/// Metrics for prepared text under the given alignment.
pub(crate) fn metrics(prepared: &PreparedText, align: TextAlign) -> TextMetrics {
    let left = align_offset(prepared.width, align);
    let ascent = prepared.baseline;
    let descent = (prepared.height - prepared.baseline).max(0.0);
    TextMetrics {
        width: prepared.width,
        actual_bounding_box_left: -left,
        actual_bounding_box_right: left + prepared.width,
        font_bounding_box_ascent: ascent,
        font_bounding_box_descent: descent,
        actual_bounding_box_ascent: ascent,
        actual_bounding_box_descent: descent,
        em_height_ascent: ascent,
        em_height_descent: descent,
        hanging_baseline: ascent,
        alphabetic_baseline: 0.0,
        ideographic_baseline: 0.0,
    }
}
