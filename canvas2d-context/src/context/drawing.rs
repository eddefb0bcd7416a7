//! Fill, stroke, clip and hit-testing for Canvas2dContext.

use super::Canvas2dContext;
use crate::composite::CompositeOperator;
use crate::drawing_state::ClipPath;
use crate::geometry::{FloatRect, RectParams};
use crate::painter::{Effects, Painter};
use crate::path2d::{close_subpaths, contains_point, Path2D};
use crate::style::CanvasFillRule;
use tiny_skia::{Color, Mask, Paint, Path, PathBuilder, Stroke, StrokeDash, Transform};

impl Canvas2dContext {
    // --- Current path ---

    /// Fill the current path using the non-zero winding rule.
    pub fn fill(&mut self) {
        self.fill_with_rule(CanvasFillRule::NonZero);
    }

    pub fn fill_with_rule(&mut self, rule: CanvasFillRule) {
        log::debug!(target: "canvas", "fill {:?}", rule);
        if let Some(path) = self.path.to_path() {
            self.fill_internal(&path, rule, Transform::identity());
        }
    }

    /// Stroke the current path. Subpaths are left open.
    pub fn stroke(&mut self) {
        log::debug!(target: "canvas", "stroke");
        if let Some(path) = self.path.to_path() {
            // The path is already in device space; scale the pen to match.
            let scale = average_scale(&self.state.transform);
            self.stroke_internal(&path, Transform::identity(), scale);
        }
    }

    /// Intersect the clip region with the current path.
    pub fn clip(&mut self) {
        self.clip_with_rule(CanvasFillRule::NonZero);
    }

    pub fn clip_with_rule(&mut self, rule: CanvasFillRule) {
        log::debug!(target: "canvas", "clip {:?}", rule);
        if let Some(path) = self.path.to_path() {
            self.clip_internal(&path, rule);
        }
    }

    /// Whether the device-space point `(x, y)` is inside the current path.
    pub fn is_point_in_path(&self, x: f32, y: f32, rule: CanvasFillRule) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        self.path
            .to_path()
            .and_then(|p| close_subpaths(&p))
            .is_some_and(|p| contains_point(&p, x as f64, y as f64, rule))
    }

    // --- Path2D ---

    pub fn fill_path2d(&mut self, path: &Path2D, rule: CanvasFillRule) {
        log::debug!(target: "canvas", "fill path2d {:?}", rule);
        if let Some(p) = path.to_path() {
            let transform = self.state.transform;
            self.fill_internal(&p, rule, transform);
        }
    }

    pub fn stroke_path2d(&mut self, path: &Path2D) {
        log::debug!(target: "canvas", "stroke path2d");
        if let Some(p) = path.to_path() {
            let transform = self.state.transform;
            self.stroke_internal(&p, transform, 1.0);
        }
    }

    pub fn clip_path2d(&mut self, path: &Path2D, rule: CanvasFillRule) {
        log::debug!(target: "canvas", "clip path2d {:?}", rule);
        if let Some(p) = path.to_path().and_then(|p| p.transform(self.state.transform)) {
            self.clip_internal(&p, rule);
        }
    }

    /// Hit-test a `Path2D` mapped through the current transform.
    pub fn is_point_in_path2d(&self, path: &Path2D, x: f32, y: f32, rule: CanvasFillRule) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        path.to_path()
            .and_then(|p| p.transform(self.state.transform))
            .and_then(|p| close_subpaths(&p))
            .is_some_and(|p| contains_point(&p, x as f64, y as f64, rule))
    }

    // --- Rectangles ---

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", x, y, width, height);
        if let Some(path) = rect_path(x, y, width, height) {
            let transform = self.state.transform;
            self.fill_internal(&path, CanvasFillRule::EvenOdd, transform);
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "strokeRect {} {} {} {}", x, y, width, height);
        let mut path = Path2D::new();
        path.rect(&RectParams {
            x,
            y,
            width,
            height,
        });
        if let Some(path) = path.to_path() {
            let transform = self.state.transform;
            self.stroke_internal(&path, transform, 1.0);
        }
    }

    /// Reset the pixels under the rectangle to the clear color.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        log::debug!(target: "canvas", "clearRect {} {} {} {}", x, y, width, height);
        let Some(path) = rect_path(x, y, width, height).and_then(|p| p.transform(self.state.transform))
        else {
            return;
        };
        let clip = self.clip_mask();
        let color = self.clear_color();
        if !self.ensure_surface() {
            return;
        }
        if let Some(painter) = self.surface.as_mut() {
            painter.clear_path(&path, color, clip.as_ref());
        }
        self.did_draw(Some(FloatRect::from(path.bounds())));
    }

    // --- Pipeline ---

    /// Fill `path` (mapped by `transform`) with the fill color. Open subpaths
    /// are closed first.
    pub(crate) fn fill_internal(&mut self, path: &Path, rule: CanvasFillRule, transform: Transform) {
        let Some(closed) = close_subpaths(path) else {
            return;
        };
        let paint = self.solid_paint(self.state.fill_style);
        let bounds = device_bounds(&closed, transform, 0.0);
        let rule: tiny_skia::FillRule = rule.into();
        self.paint_with_shadow(bounds, |painter, clip, effects| {
            painter.fill_path(&closed, &paint, rule, transform, clip, effects)
        });
    }

    /// Stroke `path` (mapped by `transform`). Line width and dashes are
    /// multiplied by `width_scale`.
    pub(crate) fn stroke_internal(&mut self, path: &Path, transform: Transform, width_scale: f32) {
        let stroke = self.current_stroke(width_scale);
        let paint = self.solid_paint(self.state.stroke_style);
        let pad = stroke.width * stroke.miter_limit.max(1.0) / 2.0;
        let bounds = device_bounds(path, transform, pad * average_scale(&transform));
        self.paint_with_shadow(bounds, |painter, clip, effects| {
            painter.stroke_path(path, &paint, &stroke, transform, clip, effects)
        });
    }

    /// Run `draw` once for the shadow, unless the operator is `copy`, then
    /// once for the shape itself.
    pub(crate) fn paint_with_shadow<F>(&mut self, bounds: Option<FloatRect>, draw: F)
    where
        F: Fn(&mut Painter, Option<&Mask>, Effects),
    {
        let clip = self.clip_mask();
        if !self.ensure_surface() {
            return;
        }
        let state = &self.state;
        let Some(painter) = self.surface.as_mut() else {
            return;
        };

        let shadow = state.composite != CompositeOperator::Copy && state.shadow_visible();
        if shadow {
            let mut shadowed = painter.translated(state.shadow_offset_x, state.shadow_offset_y);
            // Coverage already carries the paint alpha and global alpha.
            let effects = Effects {
                tint: Some(state.shadow_color),
                blur_sigma: state.shadow_blur / 2.0,
                filter: None,
            };
            draw(&mut *shadowed, clip.as_ref(), effects);
        }
        let effects = Effects {
            filter: state.filter.as_ref(),
            ..Effects::default()
        };
        draw(painter, clip.as_ref(), effects);

        let exact = !shadow
            && state.filter.is_none()
            && matches!(
                state.composite,
                CompositeOperator::SourceOver | CompositeOperator::Normal
            );
        self.did_draw(if exact { bounds } else { None });
    }

    fn clip_internal(&mut self, device_path: &Path, rule: CanvasFillRule) {
        if let Some(path) = close_subpaths(device_path) {
            self.state.clip.push(ClipPath {
                path,
                fill_rule: rule,
            });
        }
    }

    pub(crate) fn solid_paint(&self, color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.state.effective_color(color));
        paint.anti_alias = true;
        paint.blend_mode = self.state.composite.into();
        paint
    }

    pub(crate) fn current_stroke(&self, width_scale: f32) -> Stroke {
        let state = &self.state;
        let dash = if state.line_dash.is_empty() {
            None
        } else {
            let dashes = state.line_dash.iter().map(|d| d * width_scale).collect();
            StrokeDash::new(dashes, state.line_dash_offset * width_scale)
        };
        Stroke {
            width: state.line_width * width_scale,
            miter_limit: state.miter_limit,
            line_cap: state.line_cap.into(),
            line_join: state.line_join.into(),
            dash,
        }
    }
}

/// Average axis scale of a transform.
pub(crate) fn average_scale(t: &Transform) -> f32 {
    ((t.sx * t.sx + t.ky * t.ky).sqrt() + (t.kx * t.kx + t.sy * t.sy).sqrt()) / 2.0
}

fn rect_path(x: f32, y: f32, width: f32, height: f32) -> Option<Path> {
    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
        return None;
    }
    let rect = FloatRect::new(x, y, width, height).normalized();
    rect.to_skia().map(PathBuilder::from_rect)
}

fn device_bounds(path: &Path, transform: Transform, pad: f32) -> Option<FloatRect> {
    let bounds = path.clone().transform(transform)?.bounds();
    Some(FloatRect::new(
        bounds.x() - pad - 1.0,
        bounds.y() - pad - 1.0,
        bounds.width() + 2.0 * pad + 2.0,
        bounds.height() + 2.0 * pad + 2.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::test_context;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> RectParams {
        RectParams {
            x,
            y,
            width,
            height,
        }
    }

    fn pixel(ctx: &Canvas2dContext, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let pixmap = ctx.surface_pixmap().unwrap();
        let px = pixmap.pixels()[(y * pixmap.width() + x) as usize].demultiply();
        (px.red(), px.green(), px.blue(), px.alpha())
    }

    #[test]
    fn test_fill_rect_color() {
        let mut ctx = test_context(20, 20);
        ctx.set_fill_style("#00ff00").unwrap();
        ctx.fill_rect(5.0, 5.0, 10.0, 10.0);
        assert_eq!(pixel(&ctx, 10, 10), (0, 255, 0, 255));
        assert_eq!(pixel(&ctx, 2, 2), (0, 0, 0, 0));
    }

    #[test]
    fn test_fill_closes_open_subpath() {
        let mut ctx = test_context(20, 20);
        ctx.move_to(0.0, 0.0);
        ctx.line_to(20.0, 0.0);
        ctx.line_to(20.0, 20.0);
        ctx.fill();
        assert_eq!(pixel(&ctx, 18, 5).3, 255);
        assert_eq!(pixel(&ctx, 2, 18).3, 0);
    }

    #[test]
    fn test_shadow_is_painted_offset() {
        let mut ctx = test_context(30, 30);
        ctx.set_shadow_color("red");
        ctx.set_shadow_offset_x(15.0);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(pixel(&ctx, 5, 5), (0, 0, 0, 255));
        assert_eq!(pixel(&ctx, 20, 5), (255, 0, 0, 255));
    }

    #[test]
    fn test_copy_never_paints_shadow() {
        let mut ctx = test_context(30, 30);
        ctx.set_shadow_color("red");
        ctx.set_shadow_offset_x(15.0);
        ctx.set_shadow_blur(2.0);
        ctx.set_global_composite_operation("copy");
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(pixel(&ctx, 20, 5).3, 0);
        assert_eq!(pixel(&ctx, 5, 5), (0, 0, 0, 255));
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut ctx = test_context(20, 20);
        ctx.rect(&rect(0.0, 0.0, 10.0, 20.0));
        ctx.clip();
        ctx.begin_path();
        ctx.fill_rect(0.0, 0.0, 20.0, 20.0);
        assert_eq!(pixel(&ctx, 5, 5).3, 255);
        assert_eq!(pixel(&ctx, 15, 5).3, 0);
    }

    #[test]
    fn test_clip_is_restored() {
        let mut ctx = test_context(20, 20);
        ctx.save();
        ctx.rect(&rect(0.0, 0.0, 10.0, 20.0));
        ctx.clip();
        ctx.restore();
        ctx.fill_rect(0.0, 0.0, 20.0, 20.0);
        assert_eq!(pixel(&ctx, 15, 5).3, 255);
    }

    #[test]
    fn test_clear_rect_transparent_and_opaque() {
        let mut ctx = test_context(10, 10);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        ctx.clear_rect(0.0, 0.0, 5.0, 10.0);
        assert_eq!(pixel(&ctx, 2, 2).3, 0);
        assert_eq!(pixel(&ctx, 7, 2).3, 255);
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut ctx = test_context(20, 20);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(5.0, 5.0, 10.0, 10.0);
        assert_eq!(pixel(&ctx, 5, 10).3, 255);
        assert_eq!(pixel(&ctx, 10, 10).3, 0);
    }

    #[test]
    fn test_point_in_path() {
        let mut ctx = test_context(20, 20);
        ctx.rect(&rect(0.0, 0.0, 10.0, 10.0));
        assert!(ctx.is_point_in_path(5.0, 5.0, CanvasFillRule::NonZero));
        assert!(!ctx.is_point_in_path(15.0, 5.0, CanvasFillRule::NonZero));
        assert!(!ctx.is_point_in_path(f32::NAN, 5.0, CanvasFillRule::NonZero));
    }

    #[test]
    fn test_point_in_path2d_uses_transform() {
        let mut ctx = test_context(40, 40);
        let mut path = Path2D::new();
        path.rect(&rect(0.0, 0.0, 10.0, 10.0));
        ctx.translate(20.0, 20.0);
        assert!(ctx.is_point_in_path2d(&path, 25.0, 25.0, CanvasFillRule::NonZero));
        assert!(!ctx.is_point_in_path2d(&path, 5.0, 5.0, CanvasFillRule::NonZero));
    }

    #[test]
    fn test_filter_applies_to_fill() {
        let mut ctx = test_context(10, 10);
        ctx.set_fill_style("red").unwrap();
        ctx.set_filter("invert(1)");
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(pixel(&ctx, 5, 5), (0, 255, 255, 255));
    }

    #[test]
    fn test_average_scale() {
        assert_eq!(average_scale(&Transform::from_scale(2.0, 4.0)), 3.0);
        assert_eq!(average_scale(&Transform::identity()), 1.0);
    }
}
