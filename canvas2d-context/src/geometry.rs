//! Geometry parameter types shared by paths, image drawing and pixel transfer.

/// Parameters for rectangle operations (rect, fillRect, strokeRect, clearRect).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Parameters for arc operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// X coordinate of the arc center.
    pub x: f32,
    /// Y coordinate of the arc center.
    pub y: f32,
    pub radius: f32,
    /// Start angle in radians.
    pub start_angle: f32,
    /// End angle in radians.
    pub end_angle: f32,
    pub anticlockwise: bool,
}

/// Parameters for ellipse operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    pub x: f32,
    pub y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation of the ellipse in radians.
    pub rotation: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub anticlockwise: bool,
}

/// Parameters for cubic bezier curve operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezierParams {
    pub cp1x: f32,
    pub cp1y: f32,
    pub cp2x: f32,
    pub cp2y: f32,
    pub x: f32,
    pub y: f32,
}

/// Parameters for quadratic bezier curve operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezierParams {
    pub cpx: f32,
    pub cpy: f32,
    pub x: f32,
    pub y: f32,
}

/// Source and destination rectangles of a cropped drawImage call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageCropParams {
    /// Source X coordinate.
    pub sx: f32,
    /// Source Y coordinate.
    pub sy: f32,
    /// Source width.
    pub sw: f32,
    /// Source height.
    pub sh: f32,
    /// Destination X coordinate.
    pub dx: f32,
    /// Destination Y coordinate.
    pub dy: f32,
    /// Destination width.
    pub dw: f32,
    /// Destination height.
    pub dh: f32,
}

impl ImageCropParams {
    pub(crate) fn all_finite(&self) -> bool {
        [
            self.sx, self.sy, self.sw, self.sh, self.dx, self.dy, self.dw, self.dh,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Sub-rectangle of a pixel buffer written by putImageData.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Axis-aligned float rectangle with non-negative extents once normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FloatRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same rectangle expressed with non-negative width and height.
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Intersection of two normalized rectangles; empty when they are disjoint.
    pub fn intersected(&self, other: &FloatRect) -> FloatRect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        FloatRect {
            x,
            y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
        }
    }

    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

impl From<tiny_skia::Rect> for FloatRect {
    fn from(rect: tiny_skia::Rect) -> Self {
        FloatRect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_negative_extent() {
        let r = FloatRect::new(10.0, 20.0, -5.0, -8.0).normalized();
        assert_eq!(r, FloatRect::new(5.0, 12.0, 5.0, 8.0));
    }

    #[test]
    fn test_intersected() {
        let a = FloatRect::new(50.0, 50.0, 100.0, 100.0);
        let b = FloatRect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(a.intersected(&b), FloatRect::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_intersected_disjoint_is_empty() {
        let a = FloatRect::new(200.0, 200.0, 10.0, 10.0);
        let b = FloatRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(a.intersected(&b).is_empty());
    }

    #[test]
    fn test_crop_params_finite() {
        let mut params = ImageCropParams {
            sx: 0.0,
            sy: 0.0,
            sw: 1.0,
            sh: 1.0,
            dx: 0.0,
            dy: 0.0,
            dw: 1.0,
            dh: 1.0,
        };
        assert!(params.all_finite());
        params.dh = f32::NAN;
        assert!(!params.all_finite());
    }
}
