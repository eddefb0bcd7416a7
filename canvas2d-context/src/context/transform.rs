//! Transform operations for Canvas2dContext.
//!
//! Calls with any non-finite argument are ignored.

use super::Canvas2dContext;
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Translate the canvas.
    pub fn translate(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "translate {} {}", x, y);
        if x.is_finite() && y.is_finite() {
            self.state.transform = self.state.transform.pre_translate(x, y);
        }
    }

    /// Rotate the canvas by `angle` radians, clockwise.
    pub fn rotate(&mut self, angle: f32) {
        log::debug!(target: "canvas", "rotate {}", angle);
        if !angle.is_finite() {
            return;
        }
        let (sin, cos) = angle.sin_cos();
        let rotation = Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0);
        self.state.transform = self.state.transform.pre_concat(rotation);
    }

    /// Scale the canvas.
    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        if x.is_finite() && y.is_finite() {
            self.state.transform = self.state.transform.pre_scale(x, y);
        }
    }

    /// Multiply the current transform by the matrix `[a c e; b d f; 0 0 1]`.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        log::debug!(target: "canvas", "transform {} {} {} {} {} {}", a, b, c, d, e, f);
        if [a, b, c, d, e, f].iter().all(|v| v.is_finite()) {
            let t = Transform::from_row(a, b, c, d, e, f);
            self.state.transform = self.state.transform.pre_concat(t);
        }
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        log::debug!(target: "canvas", "setTransform {} {} {} {} {} {}", a, b, c, d, e, f);
        if [a, b, c, d, e, f].iter().all(|v| v.is_finite()) {
            self.state.transform = Transform::from_row(a, b, c, d, e, f);
        }
    }

    /// Reset the transform to identity.
    pub fn reset_transform(&mut self) {
        log::debug!(target: "canvas", "resetTransform");
        self.state.transform = Transform::identity();
    }

    /// Get the current transformation matrix.
    pub fn get_transform(&self) -> Transform {
        self.state.transform
    }
}

#[cfg(test)]
mod tests {
    use crate::context::tests::test_context;
    use tiny_skia::Transform;

    #[test]
    fn test_translate_then_scale() {
        let mut ctx = test_context(10, 10);
        ctx.translate(10.0, 20.0);
        ctx.scale(2.0, 3.0);
        assert_eq!(
            ctx.get_transform(),
            Transform::from_row(2.0, 0.0, 0.0, 3.0, 10.0, 20.0)
        );
    }

    #[test]
    fn test_non_finite_is_ignored() {
        let mut ctx = test_context(10, 10);
        ctx.translate(f32::NAN, 1.0);
        ctx.scale(f32::INFINITY, 1.0);
        ctx.rotate(f32::NAN);
        ctx.transform(1.0, 0.0, 0.0, 1.0, f32::NAN, 0.0);
        ctx.set_transform(f32::INFINITY, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(ctx.get_transform(), Transform::identity());
    }

    #[test]
    fn test_set_and_reset() {
        let mut ctx = test_context(10, 10);
        ctx.set_transform(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(
            ctx.get_transform(),
            Transform::from_row(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)
        );
        ctx.reset_transform();
        assert_eq!(ctx.get_transform(), Transform::identity());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut ctx = test_context(10, 10);
        ctx.rotate(std::f32::consts::FRAC_PI_2);
        let mut points = [tiny_skia::Point::from_xy(1.0, 0.0)];
        ctx.get_transform().map_points(&mut points);
        assert!(points[0].x.abs() < 1e-6);
        assert!((points[0].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transform_is_saved_and_restored() {
        let mut ctx = test_context(10, 10);
        ctx.save();
        ctx.translate(3.0, 4.0);
        ctx.restore();
        assert_eq!(ctx.get_transform(), Transform::identity());
    }
}
