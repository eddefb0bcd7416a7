//! Drawing state that can be saved and restored.

use crate::composite::CompositeOperator;
use crate::filter::Filter;
use crate::font_parser::ParsedFont;
use crate::style::{CanvasFillRule, ImageSmoothingQuality, LineCap, LineJoin, TextAlign, TextBaseline};
use tiny_skia::{Color, Transform};

/// One clip region, already in device space.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPath {
    pub path: tiny_skia::Path,
    pub fill_rule: CanvasFillRule,
}

/// Drawing state that can be saved and restored.
///
/// Each `save()` pushes a full copy; `restore()` swaps it back in.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    pub fill_style: Color,
    pub stroke_style: Color,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    /// Dash pattern, always even length.
    pub line_dash: Vec<f32>,
    pub line_dash_offset: f32,
    /// In `[0, 1]`.
    pub global_alpha: f32,
    pub composite: CompositeOperator,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
    /// Non-negative.
    pub shadow_blur: f32,
    pub shadow_color: Color,
    /// Resolved chain; `None` when the filter is "none".
    pub filter: Option<Filter>,
    /// The string `filter` was parsed from. Set and cleared with it.
    pub filter_string: Option<String>,
    pub font: ParsedFont,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub image_smoothing_enabled: bool,
    pub image_smoothing_quality: ImageSmoothingQuality,
    pub transform: Transform,
    /// Clip regions intersected in order. Empty means unclipped.
    pub clip: Vec<ClipPath>,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_style: Color::BLACK,
            stroke_style: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            global_alpha: 1.0,
            composite: CompositeOperator::default(),
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: Color::TRANSPARENT,
            filter: None,
            filter_string: None,
            font: ParsedFont::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            image_smoothing_enabled: true,
            image_smoothing_quality: ImageSmoothingQuality::default(),
            transform: Transform::identity(),
            clip: Vec::new(),
        }
    }
}

impl DrawingState {
    /// Whether a shadow pass would paint anything.
    pub(crate) fn shadow_visible(&self) -> bool {
        self.shadow_color.alpha() > 0.0
            && (self.shadow_blur != 0.0 || self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0)
    }

    /// Fill color with global alpha folded in.
    pub(crate) fn effective_color(&self, mut color: Color) -> Color {
        color.apply_opacity(self.global_alpha);
        color
    }
}
