//! Canvas 2D rendering context.

mod drawing;
mod image_ops;
mod path_ops;
mod pixel_ops;
mod surface;
mod text_rendering;
mod transform;

pub use image_ops::compute_draw_rects;

use crate::composite::CompositeOperator;
use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::filter_parser::parse_filter;
use crate::font_config::{font_config_to_fontdb, FontConfig};
use crate::host::CanvasHost;
use crate::painter::Painter;
use crate::path2d::Path2D;
use crate::settings::{CanvasRenderingContext2DSettings, CanvasSettingsInit};
use crate::style::{parse_color, serialize_color, ImageSmoothingQuality, LineCap, LineJoin};
use crate::text::TextShaper;
use std::rc::{Rc, Weak};

/// Largest accepted width or height.
const MAX_DIMENSION: u32 = 32767;

/// Canvas 2D rendering context.
pub struct Canvas2dContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) settings: CanvasRenderingContext2DSettings,
    /// Allocated on first paint, dropped on resize.
    pub(crate) surface: Option<Painter>,
    pub(crate) state: DrawingState,
    state_stack: Vec<DrawingState>,
    /// Default path, stored in device space.
    pub(crate) path: Path2D,
    /// Only ever goes from true to false.
    pub(crate) origin_clean: bool,
    pub(crate) text: TextShaper,
    pub(crate) host: Option<Weak<dyn CanvasHost>>,
}

/// Builder for [`Canvas2dContext`].
#[derive(Default)]
pub struct Canvas2dContextBuilder {
    width: u32,
    height: u32,
    settings: CanvasSettingsInit,
    font_config: Option<FontConfig>,
    host: Option<Weak<dyn CanvasHost>>,
}

impl Canvas2dContextBuilder {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn settings(mut self, settings: CanvasSettingsInit) -> Self {
        self.settings = settings;
        self
    }

    pub fn font_config(mut self, config: FontConfig) -> Self {
        self.font_config = Some(config);
        self
    }

    /// Attach the host element. Only a weak reference is kept.
    pub fn host(mut self, host: &Rc<dyn CanvasHost>) -> Self {
        self.host = Some(Rc::downgrade(host));
        self
    }

    pub fn build(self) -> Canvas2dResult<Canvas2dContext> {
        let settings = CanvasRenderingContext2DSettings::try_from(&self.settings)?;
        check_dimensions(self.width, self.height)?;
        let config = self.font_config.unwrap_or_default();
        let text = TextShaper::new(font_config_to_fontdb(&config), config.hinting_enabled);
        log::debug!(
            target: "canvas",
            "create context {}x{} {:?}",
            self.width,
            self.height,
            settings
        );
        Ok(Canvas2dContext {
            width: self.width,
            height: self.height,
            settings,
            surface: None,
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path: Path2D::new(),
            origin_clean: true,
            text,
            host: self.host,
        })
    }
}

fn check_dimensions(width: u32, height: u32) -> Canvas2dResult<()> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Canvas2dError::InvalidDimensions { width, height });
    }
    Ok(())
}

impl Canvas2dContext {
    /// Create a context with default settings and font configuration.
    ///
    /// A zero dimension is allowed; drawing is then a no-op.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::builder().size(width, height).build()
    }

    /// Create a context with explicit settings.
    pub fn with_settings(width: u32, height: u32, settings: CanvasSettingsInit) -> Canvas2dResult<Self> {
        Self::builder().size(width, height).settings(settings).build()
    }

    pub fn builder() -> Canvas2dContextBuilder {
        Canvas2dContextBuilder::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The settings the context was created with.
    pub fn get_context_attributes(&self) -> CanvasRenderingContext2DSettings {
        self.settings
    }

    pub fn origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// Current drawing state, for inspection.
    pub fn drawing_state(&self) -> &DrawingState {
        &self.state
    }

    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Pop the last saved state. Does nothing when the stack is empty.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    /// Clear the surface, the default path, the state stack and the drawing state.
    pub fn reset(&mut self) {
        log::debug!(target: "canvas", "reset");
        let clear = self.clear_color();
        if let Some(painter) = self.surface.as_mut() {
            painter.clear_all(clear);
        }
        self.state = DrawingState::default();
        self.state_stack.clear();
        self.path.clear();
        self.did_draw(None);
    }

    // --- Style setters ---

    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        self.state.fill_style = parse_color(style)?;
        Ok(())
    }

    pub fn fill_style(&self) -> String {
        serialize_color(self.state.fill_style)
    }

    pub fn set_stroke_style(&mut self, style: &str) -> Canvas2dResult<()> {
        self.state.stroke_style = parse_color(style)?;
        Ok(())
    }

    pub fn stroke_style(&self) -> String {
        serialize_color(self.state.stroke_style)
    }

    /// Ignores non-finite or non-positive values.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    pub fn line_cap(&self) -> LineCap {
        self.state.line_cap
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    pub fn line_join(&self) -> LineJoin {
        self.state.line_join
    }

    /// Ignores non-finite or non-positive values.
    pub fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    pub fn miter_limit(&self) -> f32 {
        self.state.miter_limit
    }

    /// Ignores the call if any value is non-finite or negative. Odd-length
    /// lists are repeated to even length.
    pub fn set_line_dash(&mut self, mut segments: Vec<f32>) {
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return;
        }
        if segments.len() % 2 == 1 {
            segments.extend_from_within(..);
        }
        self.state.line_dash = segments;
    }

    pub fn line_dash(&self) -> &[f32] {
        &self.state.line_dash
    }

    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.line_dash_offset = offset;
        }
    }

    pub fn line_dash_offset(&self) -> f32 {
        self.state.line_dash_offset
    }

    // --- Compositing ---

    /// Ignores non-finite values and values outside `[0, 1]`.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Returns false, leaving the operator unchanged, for an unknown name.
    pub fn set_global_composite_operation(&mut self, name: &str) -> bool {
        match CompositeOperator::from_name(name) {
            Some(op) => {
                self.state.composite = op;
                true
            }
            None => {
                log::debug!(target: "canvas", "ignoring unknown composite operation {:?}", name);
                false
            }
        }
    }

    pub fn global_composite_operation(&self) -> &'static str {
        self.state.composite.name()
    }

    // --- Shadows ---

    pub fn set_shadow_offset_x(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow_offset_x = offset;
        }
    }

    pub fn shadow_offset_x(&self) -> f32 {
        self.state.shadow_offset_x
    }

    pub fn set_shadow_offset_y(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.shadow_offset_y = offset;
        }
    }

    pub fn shadow_offset_y(&self) -> f32 {
        self.state.shadow_offset_y
    }

    /// Ignores negative, infinite and NaN values.
    pub fn set_shadow_blur(&mut self, blur: f32) {
        if blur.is_finite() && blur >= 0.0 {
            self.state.shadow_blur = blur;
        }
    }

    pub fn shadow_blur(&self) -> f32 {
        self.state.shadow_blur
    }

    /// Ignores strings that are not valid CSS colors.
    pub fn set_shadow_color(&mut self, color: &str) {
        match parse_color(color) {
            Ok(color) => self.state.shadow_color = color,
            Err(err) => log::debug!(target: "canvas", "ignoring shadow color: {}", err),
        }
    }

    pub fn shadow_color(&self) -> String {
        serialize_color(self.state.shadow_color)
    }

    // --- Filter ---

    /// Set the filter from a CSS filter list.
    ///
    /// `"none"` clears the filter. A string that fails to parse leaves the
    /// current filter in place.
    pub fn set_filter(&mut self, filter: &str) {
        if filter == "none" {
            self.state.filter = None;
            self.state.filter_string = None;
            return;
        }
        match parse_filter(filter, self.state.font.size_px) {
            Ok(chain) => {
                self.state.filter = Some(chain);
                self.state.filter_string = Some(filter.to_string());
            }
            Err(err) => log::debug!(target: "canvas", "ignoring filter {:?}: {}", filter, err),
        }
    }

    pub fn filter(&self) -> &str {
        self.state.filter_string.as_deref().unwrap_or("none")
    }

    // --- Image smoothing ---

    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.state.image_smoothing_enabled = enabled;
    }

    pub fn image_smoothing_enabled(&self) -> bool {
        self.state.image_smoothing_enabled
    }

    pub fn set_image_smoothing_quality(&mut self, quality: ImageSmoothingQuality) {
        self.state.image_smoothing_quality = quality;
    }

    pub fn image_smoothing_quality(&self) -> ImageSmoothingQuality {
        self.state.image_smoothing_quality
    }

    pub(crate) fn image_filter_quality(&self) -> tiny_skia::FilterQuality {
        if self.state.image_smoothing_enabled {
            self.state.image_smoothing_quality.into()
        } else {
            tiny_skia::FilterQuality::Nearest
        }
    }
}
