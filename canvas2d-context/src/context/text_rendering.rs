//! Text rendering operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::font_parser::parse_font;
use crate::style::{CanvasFillRule, TextAlign, TextBaseline};
use crate::text::{metrics, placement, TextMetrics};

impl Canvas2dContext {
    /// Set the font from a CSS font shorthand. The previous font is kept when
    /// the string does not parse.
    pub fn set_font(&mut self, font: &str) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "font = {}", font);
        self.state.font = parse_font(font)?;
        Ok(())
    }

    /// Current font, serialized as a CSS shorthand.
    pub fn font(&self) -> String {
        self.state.font.to_css()
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn text_align(&self) -> TextAlign {
        self.state.text_align
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    pub fn text_baseline(&self) -> TextBaseline {
        self.state.text_baseline
    }

    /// Measure text with the current font and alignment.
    pub fn measure_text(&mut self, text: &str) -> TextMetrics {
        log::debug!(target: "canvas", "measureText \"{}\"", text);
        let prepared = self.text.prepare(text, &self.state.font, None);
        metrics(&prepared, self.state.text_align)
    }

    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        self.render_text(text, x, y, None, true);
    }

    /// Fill text, compressing it horizontally when wider than `max_width`.
    /// Nothing is drawn for a `max_width` that is zero, negative or NaN.
    pub fn fill_text_max_width(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {} max {}", text, x, y, max_width);
        self.render_text(text, x, y, Some(max_width), true);
    }

    pub fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "strokeText \"{}\" {} {}", text, x, y);
        self.render_text(text, x, y, None, false);
    }

    pub fn stroke_text_max_width(&mut self, text: &str, x: f32, y: f32, max_width: f32) {
        log::debug!(target: "canvas", "strokeText \"{}\" {} {} max {}", text, x, y, max_width);
        self.render_text(text, x, y, Some(max_width), false);
    }

    fn render_text(&mut self, text: &str, x: f32, y: f32, max_width: Option<f32>, fill: bool) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let prepared = self.text.prepare(text, &self.state.font, max_width);
        let Some(path) = prepared.path.as_ref() else {
            return;
        };
        let transform = placement(
            &prepared,
            x,
            y,
            self.state.font.size_px,
            self.state.text_align,
            self.state.text_baseline,
        )
        .post_concat(self.state.transform);

        if fill {
            self.fill_internal(path, CanvasFillRule::NonZero, transform);
        } else {
            self.stroke_internal(path, transform, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::tests::test_context;
    use crate::style::{TextAlign, TextBaseline};

    #[test]
    fn test_font_round_trip() {
        let mut ctx = test_context(10, 10);
        assert_eq!(ctx.font(), "10px sans-serif");
        ctx.set_font("bold 20px serif").unwrap();
        assert!(ctx.font().contains("20px"));
        assert!(ctx.font().contains("serif"));
    }

    #[test]
    fn test_bad_font_keeps_previous() {
        let mut ctx = test_context(10, 10);
        ctx.set_font("12px monospace").unwrap();
        let before = ctx.font();
        assert!(ctx.set_font("not a font").is_err());
        assert_eq!(ctx.font(), before);
    }

    #[test]
    fn test_alignment_accessors() {
        let mut ctx = test_context(10, 10);
        ctx.set_text_align(TextAlign::Center);
        ctx.set_text_baseline(TextBaseline::Middle);
        assert_eq!(ctx.text_align(), TextAlign::Center);
        assert_eq!(ctx.text_baseline(), TextBaseline::Middle);
        ctx.save();
        ctx.set_text_align(TextAlign::End);
        ctx.restore();
        assert_eq!(ctx.text_align(), TextAlign::Center);
    }

    #[test]
    fn test_non_positive_max_width_draws_nothing() {
        let mut ctx = test_context(10, 10);
        ctx.fill_text_max_width("hello", 0.0, 10.0, 0.0);
        ctx.stroke_text_max_width("hello", 0.0, 10.0, f32::NAN);
        assert!(ctx.surface_pixmap().is_none());
    }

    #[test]
    fn test_measure_empty_text() {
        let mut ctx = test_context(10, 10);
        let m = ctx.measure_text("");
        assert_eq!(m.width, 0.0);
    }
}
