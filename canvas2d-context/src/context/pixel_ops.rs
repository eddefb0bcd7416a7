//! Pixel buffer transfer for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{DirtyRect, FloatRect};
use crate::image_data::{premultiply, unpremultiply, ImageData, ImageDataSettings};

/// Integer rectangle with non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntRect {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

impl IntRect {
    fn intersect(self, other: IntRect) -> Option<IntRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        (right > left && bottom > top).then(|| IntRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

fn non_zero(width: i32, height: i32) -> Canvas2dResult<()> {
    if width == 0 || height == 0 {
        return Err(Canvas2dError::IndexSize(format!(
            "width and height must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

impl Canvas2dContext {
    /// A transparent buffer of `|width| x |height|` pixels.
    pub fn create_image_data(
        &self,
        width: i32,
        height: i32,
        settings: Option<&ImageDataSettings>,
    ) -> Canvas2dResult<ImageData> {
        log::debug!(target: "canvas", "createImageData {} {}", width, height);
        non_zero(width, height)?;
        ImageData::new(
            width.unsigned_abs(),
            height.unsigned_abs(),
            self.image_data_color_space(settings),
        )
    }

    /// A transparent buffer with the size and color space of `other`.
    pub fn create_image_data_from(&self, other: &ImageData) -> Canvas2dResult<ImageData> {
        ImageData::new(other.width(), other.height(), other.color_space())
    }

    /// Read back a rectangle of the surface as unpremultiplied RGBA.
    ///
    /// Negative extents read backwards from `(x, y)`. Pixels outside the
    /// surface are transparent.
    pub fn get_image_data(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        settings: Option<&ImageDataSettings>,
    ) -> Canvas2dResult<ImageData> {
        log::debug!(target: "canvas", "getImageData {} {} {} {}", x, y, width, height);
        non_zero(width, height)?;
        if !self.origin_clean {
            return Err(Canvas2dError::Security(
                "canvas is not origin-clean".to_string(),
            ));
        }
        let mut out = ImageData::new(
            width.unsigned_abs(),
            height.unsigned_abs(),
            self.image_data_color_space(settings),
        )?;

        let Some(pixmap) = self.surface_pixmap() else {
            return Ok(out);
        };
        let requested = IntRect {
            x: x as i64 + width.min(0) as i64,
            y: y as i64 + height.min(0) as i64,
            width: width.unsigned_abs() as i64,
            height: height.unsigned_abs() as i64,
        };
        let surface = IntRect {
            x: 0,
            y: 0,
            width: pixmap.width() as i64,
            height: pixmap.height() as i64,
        };
        let Some(area) = requested.intersect(surface) else {
            return Ok(out);
        };

        let pixels = pixmap.pixels();
        let stride = pixmap.width() as usize;
        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                let px = pixels[row as usize * stride + col as usize];
                let offset = out.pixel_offset((col - requested.x) as u32, (row - requested.y) as u32);
                out.data_mut()[offset..offset + 4].copy_from_slice(&unpremultiply(px));
            }
        }
        Ok(out)
    }

    /// Overwrite surface pixels with `image` placed at `(dx, dy)`.
    ///
    /// Transform, clip, global alpha and the compositing operator do not apply.
    pub fn put_image_data(&mut self, image: &ImageData, dx: i32, dy: i32) {
        let dirty = DirtyRect {
            x: 0,
            y: 0,
            width: image.width() as i32,
            height: image.height() as i32,
        };
        self.put_image_data_dirty(image, dx, dy, &dirty);
    }

    /// Like [`put_image_data`](Self::put_image_data), limited to the `dirty`
    /// region of `image`.
    pub fn put_image_data_dirty(&mut self, image: &ImageData, dx: i32, dy: i32, dirty: &DirtyRect) {
        log::debug!(target: "canvas", "putImageData {} {} {:?}", dx, dy, dirty);
        let (mut dirty_x, mut dirty_width) = (dirty.x as i64, dirty.width as i64);
        if dirty_width < 0 {
            dirty_x += dirty_width;
            dirty_width = -dirty_width;
        }
        let (mut dirty_y, mut dirty_height) = (dirty.y as i64, dirty.height as i64);
        if dirty_height < 0 {
            dirty_y += dirty_height;
            dirty_height = -dirty_height;
        }
        let buffer = IntRect {
            x: 0,
            y: 0,
            width: image.width() as i64,
            height: image.height() as i64,
        };
        let Some(source) = buffer.intersect(IntRect {
            x: dirty_x,
            y: dirty_y,
            width: dirty_width,
            height: dirty_height,
        }) else {
            return;
        };

        if !self.ensure_surface() {
            return;
        }
        let Some(painter) = self.surface.as_mut() else {
            return;
        };
        let pixmap = painter.pixmap_mut();
        let surface = IntRect {
            x: 0,
            y: 0,
            width: pixmap.width() as i64,
            height: pixmap.height() as i64,
        };
        let target = IntRect {
            x: source.x + dx as i64,
            y: source.y + dy as i64,
            ..source
        };
        let Some(area) = target.intersect(surface) else {
            return;
        };

        let stride = pixmap.width() as usize;
        let pixels = pixmap.pixels_mut();
        let data = image.data();
        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                let offset = image.pixel_offset((col - dx as i64) as u32, (row - dy as i64) as u32);
                let rgba = [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]];
                pixels[row as usize * stride + col as usize] = premultiply(rgba);
            }
        }
        self.did_draw(Some(FloatRect::new(
            area.x as f32,
            area.y as f32,
            area.width as f32,
            area.height as f32,
        )));
    }

    fn image_data_color_space(
        &self,
        settings: Option<&ImageDataSettings>,
    ) -> crate::settings::PredefinedColorSpace {
        settings
            .and_then(|s| s.color_space)
            .unwrap_or(self.settings.color_space)
    }
}
