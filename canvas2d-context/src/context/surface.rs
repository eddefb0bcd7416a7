//! Backing surface lifecycle and host invalidation.

use super::Canvas2dContext;
use crate::drawing_state::ClipPath;
use crate::geometry::FloatRect;
use crate::host::CanvasHost;
use crate::painter::Painter;
use std::rc::Rc;
use tiny_skia::{Color, Mask, Pixmap};

impl Canvas2dContext {
    /// Change the surface size. The old surface is discarded when the size
    /// changes; the next paint allocates a new one.
    pub fn set_size(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        log::debug!(
            target: "canvas",
            "resize {}x{} -> {}x{}, discarding surface",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.surface = None;
    }

    /// Attach the host element that receives invalidations.
    pub fn attach_host(&mut self, host: &Rc<dyn CanvasHost>) {
        self.host = Some(Rc::downgrade(host));
    }

    /// Pixels of the surface, if one has been allocated.
    pub fn surface_pixmap(&self) -> Option<&Pixmap> {
        self.surface.as_ref().map(|painter| painter.pixmap())
    }

    /// Color a cleared pixel takes: transparent, or opaque black without alpha.
    pub(crate) fn clear_color(&self) -> Color {
        if self.settings.alpha {
            Color::TRANSPARENT
        } else {
            Color::BLACK
        }
    }

    /// Make sure a painter matching the current size exists. Returns false
    /// when the size is degenerate and nothing can be drawn.
    pub(crate) fn ensure_surface(&mut self) -> bool {
        if let Some(painter) = &self.surface {
            if painter.width() == self.width && painter.height() == self.height {
                return true;
            }
            self.surface = None;
        }
        match Painter::new(self.width, self.height, self.clear_color()) {
            Some(painter) => {
                log::debug!(target: "canvas", "allocate surface {}x{}", self.width, self.height);
                self.surface = Some(painter);
                true
            }
            None => false,
        }
    }

    /// Notify the host that `rect` changed. `None` means the whole surface.
    pub(crate) fn did_draw(&self, rect: Option<FloatRect>) {
        let Some(host) = self.host.as_ref().and_then(|weak| weak.upgrade()) else {
            return;
        };
        let full = FloatRect::new(0.0, 0.0, self.width as f32, self.height as f32);
        let rect = rect.map_or(full, |r| r.intersected(&full));
        if !rect.is_empty() {
            host.needs_redraw(rect);
        }
    }

    /// Mask for the current clip region, `None` when unclipped.
    pub(crate) fn clip_mask(&self) -> Option<Mask> {
        let (first, rest) = self.state.clip.split_first()?;
        let mut mask = Mask::new(self.width, self.height)?;
        let ClipPath { path, fill_rule } = first;
        mask.fill_path(path, (*fill_rule).into(), true, tiny_skia::Transform::identity());
        for ClipPath { path, fill_rule } in rest {
            mask.intersect_path(path, (*fill_rule).into(), true, tiny_skia::Transform::identity());
        }
        Some(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::test_context;
    use crate::host::testing::RecordingHost;
    use crate::settings::CanvasSettingsInit;

    #[test]
    fn test_surface_is_lazy() {
        let mut ctx = test_context(4, 4);
        assert!(ctx.surface_pixmap().is_none());
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert!(ctx.surface_pixmap().is_some());
    }

    #[test]
    fn test_resize_discards_surface() {
        let mut ctx = test_context(4, 4);
        ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
        ctx.set_size(4, 4);
        assert!(ctx.surface_pixmap().is_some());
        ctx.set_size(8, 2);
        assert!(ctx.surface_pixmap().is_none());
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        let pixmap = ctx.surface_pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (8, 2));
        // Only the freshly drawn pixel is set.
        assert_eq!(pixmap.pixels()[1].alpha(), 0);
    }

    #[test]
    fn test_zero_size_draws_nothing() {
        let mut ctx = test_context(0, 4);
        ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert!(ctx.surface_pixmap().is_none());
    }

    #[test]
    fn test_opaque_surface_starts_black() {
        let mut ctx = Canvas2dContext::builder()
            .size(2, 2)
            .settings(CanvasSettingsInit {
                alpha: Some(false),
                ..Default::default()
            })
            .font_config(crate::font_config::FontConfig {
                load_system_fonts: false,
                ..Default::default()
            })
            .build()
            .unwrap();
        assert!(ctx.ensure_surface());
        let px = ctx.surface_pixmap().unwrap().pixels()[3];
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (0, 0, 0, 255));
    }

    #[test]
    fn test_host_is_notified() {
        let host = Rc::new(RecordingHost::default());
        let dyn_host: Rc<dyn CanvasHost> = host.clone();
        let mut ctx = test_context(10, 10);
        ctx.attach_host(&dyn_host);
        ctx.fill_rect(2.0, 2.0, 3.0, 3.0);
        let rects = host.rects.borrow();
        assert_eq!(rects.len(), 1);
        assert!(rects[0].x <= 2.0 && rects[0].right() >= 5.0);
    }

    #[test]
    fn test_dropped_host_is_ignored() {
        let mut ctx = test_context(10, 10);
        {
            let host: Rc<dyn CanvasHost> = Rc::new(RecordingHost::default());
            ctx.attach_host(&host);
        }
        ctx.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert!(ctx.surface_pixmap().is_some());
    }
}
