//! Pixel buffers exchanged with callers, stored as unpremultiplied RGBA.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::settings::PredefinedColorSpace;
use tiny_skia::PremultipliedColorU8;

/// Settings accepted by `createImageData` and `getImageData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageDataSettings {
    /// Defaults to the context's color space.
    pub color_space: Option<PredefinedColorSpace>,
}

/// Unpremultiplied RGBA pixels, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    color_space: PredefinedColorSpace,
    data: Vec<u8>,
}

impl ImageData {
    /// A transparent buffer. Zero in either dimension is an `IndexSize` error.
    pub fn new(width: u32, height: u32, color_space: PredefinedColorSpace) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 {
            return Err(Canvas2dError::IndexSize(format!(
                "image data dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            color_space,
            data: vec![0; len],
        })
    }

    /// Wrap existing pixels. `data` must hold exactly `width * height * 4` bytes.
    pub fn from_data(
        data: Vec<u8>,
        width: u32,
        height: u32,
        color_space: PredefinedColorSpace,
    ) -> Canvas2dResult<Self> {
        if width == 0 || height == 0 {
            return Err(Canvas2dError::IndexSize(format!(
                "image data dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if data.len() != byte_len(width, height)? {
            return Err(Canvas2dError::IndexSize(format!(
                "data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            color_space,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> PredefinedColorSpace {
        self.color_space
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

fn byte_len(width: u32, height: u32) -> Canvas2dResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| {
            Canvas2dError::IndexSize(format!("image data {width}x{height} is too large"))
        })
}

/// Convert one stored pixel to straight alpha, rounding to nearest.
pub(crate) fn unpremultiply(px: PremultipliedColorU8) -> [u8; 4] {
    let a = px.alpha() as u32;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
    [channel(px.red()), channel(px.green()), channel(px.blue()), a as u8]
}

/// Convert one straight-alpha pixel to stored form.
pub(crate) fn premultiply(rgba: [u8; 4]) -> PremultipliedColorU8 {
    let a = rgba[3] as u32;
    let channel = |c: u8| ((c as u32 * a + 127) / 255) as u8;
    PremultipliedColorU8::from_rgba(channel(rgba[0]), channel(rgba[1]), channel(rgba[2]), a as u8)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}
