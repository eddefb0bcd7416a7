//! Painter bound to a backing pixmap.
//!
//! All rasterization goes through here. Draws that need post-processing
//! (shadows, filters) or an operator that affects pixels outside the shape are
//! rendered into a transparent layer first and composited afterwards.

use crate::filter::{gaussian_blur, tint_alpha, Filter};
use std::ops::{Deref, DerefMut};
use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, Mask, Paint, Path, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// Post-processing for one draw.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Effects<'a> {
    /// Replace the drawn color with this one, keeping coverage.
    pub tint: Option<Color>,
    /// Gaussian standard deviation; zero for none.
    pub blur_sigma: f32,
    pub filter: Option<&'a Filter>,
}

impl Effects<'_> {
    fn is_empty(&self) -> bool {
        self.tint.is_none() && self.blur_sigma <= 0.0 && self.filter.is_none()
    }
}

pub(crate) struct Painter {
    pixmap: Pixmap,
    /// Device-space transform applied after each draw's own transform.
    transform: Transform,
    saved: Vec<Transform>,
}

impl Painter {
    /// Allocate a surface filled with `clear`. `None` for a zero-sized surface.
    pub(crate) fn new(width: u32, height: u32, clear: Color) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        if clear != Color::TRANSPARENT {
            pixmap.fill(clear);
        }
        Some(Self {
            pixmap,
            transform: Transform::identity(),
            saved: Vec::new(),
        })
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub(crate) fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub(crate) fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn save(&mut self) {
        self.saved.push(self.transform);
    }

    pub(crate) fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }

    /// Translate the painter transform in device space until the returned guard
    /// is dropped.
    pub(crate) fn translated(&mut self, dx: f32, dy: f32) -> TransformOverride<'_> {
        self.save();
        self.transform = self.transform.post_translate(dx, dy);
        TransformOverride { painter: self }
    }

    pub(crate) fn fill_path(
        &mut self,
        path: &Path,
        paint: &Paint,
        rule: FillRule,
        transform: Transform,
        clip: Option<&Mask>,
        effects: Effects,
    ) {
        self.composite(paint.blend_mode, clip, effects, |target, blend, mask, device| {
            let mut paint = paint.clone();
            paint.blend_mode = blend;
            target.fill_path(path, &paint, rule, transform.post_concat(device), mask);
        });
    }

    pub(crate) fn stroke_path(
        &mut self,
        path: &Path,
        paint: &Paint,
        stroke: &Stroke,
        transform: Transform,
        clip: Option<&Mask>,
        effects: Effects,
    ) {
        self.composite(paint.blend_mode, clip, effects, |target, blend, mask, device| {
            let mut paint = paint.clone();
            paint.blend_mode = blend;
            target.stroke_path(path, &paint, stroke, transform.post_concat(device), mask);
        });
    }

    /// Overwrite the area covered by `path` with `color`, ignoring blending.
    pub(crate) fn clear_path(&mut self, path: &Path, color: Color, clip: Option<&Mask>) {
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.blend_mode = BlendMode::Source;
        paint.anti_alias = false;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.transform, clip);
    }

    /// Fill the whole surface with `color`, ignoring clip and blending.
    pub(crate) fn clear_all(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    fn composite<F>(&mut self, blend: BlendMode, clip: Option<&Mask>, effects: Effects, draw: F)
    where
        F: FnOnce(&mut Pixmap, BlendMode, Option<&Mask>, Transform),
    {
        if effects.is_empty() && !affects_outside_shape(blend) {
            draw(&mut self.pixmap, blend, clip, self.transform);
            return;
        }

        let Some(mut layer) = Pixmap::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        draw(&mut layer, BlendMode::SourceOver, None, self.transform);
        if let Some(color) = effects.tint {
            tint_alpha(&mut layer, color);
        }
        if effects.blur_sigma > 0.0 {
            gaussian_blur(&mut layer, effects.blur_sigma);
        }
        if let Some(filter) = effects.filter {
            filter.apply(&mut layer);
        }

        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: blend,
            quality: FilterQuality::Nearest,
        };
        self.pixmap
            .draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), clip);
    }
}

/// Operators that change destination pixels the source does not cover.
fn affects_outside_shape(blend: BlendMode) -> bool {
    matches!(
        blend,
        BlendMode::Source
            | BlendMode::SourceIn
            | BlendMode::DestinationIn
            | BlendMode::SourceOut
            | BlendMode::DestinationAtop
    )
}

/// Restores the painter transform when dropped.
pub(crate) struct TransformOverride<'a> {
    painter: &'a mut Painter,
}

impl Deref for TransformOverride<'_> {
    type Target = Painter;

    fn deref(&self) -> &Painter {
        self.painter
    }
}

impl DerefMut for TransformOverride<'_> {
    fn deref_mut(&mut self) -> &mut Painter {
        self.painter
    }
}

impl Drop for TransformOverride<'_> {
    fn drop(&mut self) {
        self.painter.restore();
    }
}
