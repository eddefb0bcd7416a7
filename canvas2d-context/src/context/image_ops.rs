//! Image drawing and PNG output operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::geometry::{FloatRect, ImageCropParams};
use crate::image_data::unpremultiply;
use crate::image_source::{CanvasImageSource, Usability};
use tiny_skia::{Paint, PathBuilder, Pattern, SpreadMode, Transform};

/// Clip a source rectangle to the `src_width` x `src_height` bitmap and shrink
/// the destination in proportion.
///
/// Both rectangles are normalized first. Returns `(source, destination)`, or
/// `None` when nothing would be drawn.
pub fn compute_draw_rects(
    src_width: u32,
    src_height: u32,
    params: &ImageCropParams,
) -> Option<(FloatRect, FloatRect)> {
    let src = FloatRect::new(params.sx, params.sy, params.sw, params.sh).normalized();
    let dst = FloatRect::new(params.dx, params.dy, params.dw, params.dh).normalized();
    if src.is_empty() || dst.is_empty() {
        return None;
    }
    let bounds = FloatRect::new(0.0, 0.0, src_width as f32, src_height as f32);
    let clipped = src.intersected(&bounds);
    if clipped.is_empty() {
        return None;
    }

    let scale_x = dst.width / src.width;
    let scale_y = dst.height / src.height;
    let dst = FloatRect::new(
        dst.x + (clipped.x - src.x) * scale_x,
        dst.y + (clipped.y - src.y) * scale_y,
        clipped.width * scale_x,
        clipped.height * scale_y,
    );
    if dst.is_empty() {
        return None;
    }
    Some((clipped, dst))
}

impl Canvas2dContext {
    /// Draw `source` at its natural size with its top-left corner at `(dx, dy)`.
    pub fn draw_image(&mut self, source: &CanvasImageSource, dx: f32, dy: f32) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "drawImage at {} {}", dx, dy);
        if !(dx.is_finite() && dy.is_finite()) {
            return Ok(());
        }
        let Some((width, height)) = source.snapshot().map(|p| (p.width() as f32, p.height() as f32))
        else {
            return source.check_usability().map(|_| ());
        };
        self.draw_image_cropped(
            source,
            &ImageCropParams {
                sx: 0.0,
                sy: 0.0,
                sw: width,
                sh: height,
                dx,
                dy,
                dw: width,
                dh: height,
            },
        )
    }

    /// Draw all of `source` into the destination rectangle.
    pub fn draw_image_scaled(
        &mut self,
        source: &CanvasImageSource,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "drawImage at {} {} size {} {}", dx, dy, dw, dh);
        if ![dx, dy, dw, dh].iter().all(|v| v.is_finite()) {
            return Ok(());
        }
        let Some((width, height)) = source.snapshot().map(|p| (p.width() as f32, p.height() as f32))
        else {
            return source.check_usability().map(|_| ());
        };
        self.draw_image_cropped(
            source,
            &ImageCropParams {
                sx: 0.0,
                sy: 0.0,
                sw: width,
                sh: height,
                dx,
                dy,
                dw,
                dh,
            },
        )
    }

    /// Draw the `(sx, sy, sw, sh)` region of `source` into `(dx, dy, dw, dh)`.
    ///
    /// Non-finite arguments and unusable sources are ignored. A zero-sized
    /// canvas or a detached bitmap is an `InvalidState` error.
    pub fn draw_image_cropped(
        &mut self,
        source: &CanvasImageSource,
        params: &ImageCropParams,
    ) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "drawImage {:?}", params);
        if !params.all_finite() {
            return Ok(());
        }
        if source.check_usability()? == Usability::Bad {
            log::debug!(target: "canvas", "drawImage skipped, source not ready");
            return Ok(());
        }
        let Some(pixmap) = source.snapshot() else {
            return Ok(());
        };
        if params.sw == 0.0 || params.sh == 0.0 {
            return Ok(());
        }

        // A cross-origin source taints the canvas even when nothing is painted.
        if !source.is_origin_clean() && self.origin_clean {
            log::debug!(target: "canvas", "drawing a cross-origin source taints the canvas");
            self.origin_clean = false;
        }

        let Some((src, dst)) = compute_draw_rects(pixmap.width(), pixmap.height(), params) else {
            return Ok(());
        };

        let Some(rect) = dst.to_skia() else {
            return Ok(());
        };
        let path = PathBuilder::from_rect(rect);
        let pattern_transform = Transform::from_translate(dst.x, dst.y)
            .pre_scale(dst.width / src.width, dst.height / src.height)
            .pre_translate(-src.x, -src.y);
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            pixmap,
            SpreadMode::Pad,
            self.image_filter_quality(),
            self.state.global_alpha,
            pattern_transform,
        );
        paint.anti_alias = true;
        paint.blend_mode = self.state.composite.into();

        let transform = self.state.transform;
        let bounds = path
            .clone()
            .transform(transform)
            .map(|p| FloatRect::from(p.bounds()));
        self.paint_with_shadow(bounds, |painter, clip, effects| {
            painter.fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::Winding,
                transform,
                clip,
                effects,
            )
        });
        Ok(())
    }

    /// Export the surface as an RGBA PNG.
    ///
    /// `ppi` sets the pixel density metadata and defaults to 72.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.straight_rgba())?;
        }
        Ok(buf)
    }

    /// Surface pixels as unpremultiplied RGBA; the clear color when no surface
    /// exists yet.
    fn straight_rgba(&self) -> Vec<u8> {
        match self.surface_pixmap() {
            Some(pixmap) => pixmap
                .pixels()
                .iter()
                .flat_map(|px| unpremultiply(*px))
                .collect(),
            None => {
                let fill: [u8; 4] = if self.settings.alpha {
                    [0, 0, 0, 0]
                } else {
                    [0, 0, 0, 255]
                };
                fill.repeat(self.width as usize * self.height as usize)
            }
        }
    }
}
