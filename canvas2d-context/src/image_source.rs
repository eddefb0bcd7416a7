//! Sources accepted by `drawImage`.

use crate::context::Canvas2dContext;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::image_data::{premultiply, ImageData};
use tiny_skia::{Pixmap, PixmapRef};

/// A decoded raster or vector image.
#[derive(Debug, Clone)]
pub struct ImageElement {
    bitmap: Option<Pixmap>,
    origin_clean: bool,
}

impl ImageElement {
    /// An image that has not finished decoding.
    pub fn pending() -> Self {
        Self {
            bitmap: None,
            origin_clean: true,
        }
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            bitmap: Some(pixmap),
            origin_clean: true,
        }
    }

    /// Build from unpremultiplied pixels.
    pub fn from_image_data(data: &ImageData) -> Self {
        Self {
            bitmap: pixmap_from_image_data(data),
            origin_clean: true,
        }
    }

    /// Mark the image as fetched from another origin.
    pub fn cross_origin(mut self) -> Self {
        self.origin_clean = false;
        self
    }

    pub fn width(&self) -> u32 {
        self.bitmap.as_ref().map_or(0, |b| b.width())
    }

    pub fn height(&self) -> u32 {
        self.bitmap.as_ref().map_or(0, |b| b.height())
    }
}

/// Loading progress of a video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VideoReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// The current frame of a video element.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub ready_state: VideoReadyState,
    pub frame: Option<Pixmap>,
    pub origin_clean: bool,
}

/// A pre-decoded bitmap that can be detached with [`ImageBitmap::close`].
#[derive(Debug, Clone)]
pub struct ImageBitmap {
    bitmap: Option<Pixmap>,
    origin_clean: bool,
}

impl ImageBitmap {
    pub fn new(pixmap: Pixmap, origin_clean: bool) -> Self {
        Self {
            bitmap: Some(pixmap),
            origin_clean,
        }
    }

    /// Release the pixels. Drawing a closed bitmap is an `InvalidState` error.
    pub fn close(&mut self) {
        self.bitmap = None;
    }

    pub fn is_detached(&self) -> bool {
        self.bitmap.is_none()
    }
}

/// Anything `drawImage` can draw.
#[derive(Clone, Copy)]
pub enum CanvasImageSource<'a> {
    Image(&'a ImageElement),
    SvgImage(&'a ImageElement),
    Canvas(&'a Canvas2dContext),
    Video(&'a VideoFrame),
    Bitmap(&'a ImageBitmap),
}

/// Outcome of the usability check that does not raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usability {
    Good,
    /// Not drawable yet; the draw is silently skipped.
    Bad,
}

impl<'a> CanvasImageSource<'a> {
    /// Check whether the source may be drawn.
    pub fn check_usability(&self) -> Canvas2dResult<Usability> {
        let usable = match self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => {
                image.width() != 0 && image.height() != 0
            }
            CanvasImageSource::Video(video) => video.ready_state > VideoReadyState::HaveMetadata,
            CanvasImageSource::Canvas(context) => {
                let (width, height) = context.size();
                if width == 0 || height == 0 {
                    return Err(Canvas2dError::InvalidState(
                        "source canvas has a zero dimension".to_string(),
                    ));
                }
                true
            }
            CanvasImageSource::Bitmap(bitmap) => {
                if bitmap.is_detached() {
                    return Err(Canvas2dError::InvalidState(
                        "image bitmap is detached".to_string(),
                    ));
                }
                true
            }
        };
        Ok(if usable { Usability::Good } else { Usability::Bad })
    }

    /// Read-only view of the current pixels.
    pub(crate) fn snapshot(&self) -> Option<PixmapRef<'a>> {
        match *self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => {
                image.bitmap.as_ref().map(|b| b.as_ref())
            }
            CanvasImageSource::Canvas(context) => context.surface_pixmap().map(|p| p.as_ref()),
            CanvasImageSource::Video(video) => video.frame.as_ref().map(|f| f.as_ref()),
            CanvasImageSource::Bitmap(bitmap) => bitmap.bitmap.as_ref().map(|b| b.as_ref()),
        }
    }

    pub fn is_origin_clean(&self) -> bool {
        match self {
            CanvasImageSource::Image(image) | CanvasImageSource::SvgImage(image) => {
                image.origin_clean
            }
            CanvasImageSource::Canvas(context) => context.origin_clean(),
            CanvasImageSource::Video(video) => video.origin_clean,
            CanvasImageSource::Bitmap(bitmap) => bitmap.origin_clean,
        }
    }
}

fn pixmap_from_image_data(data: &ImageData) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(data.width(), data.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.data().chunks_exact(4)) {
        *dst = premultiply([src[0], src[1], src[2], src[3]]);
    }
    Some(pixmap)
}
