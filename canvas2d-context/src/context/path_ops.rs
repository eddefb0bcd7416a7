//! Path building operations for Canvas2dContext.
//!
//! Points are mapped through the current transform as they are added, so the
//! default path always lives in device space.

use super::Canvas2dContext;
use crate::geometry::{ArcParams, CubicBezierParams, EllipseParams, QuadraticBezierParams, RectParams};

impl Canvas2dContext {
    /// Begin a new path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        self.sync_path_transform();
        self.path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        self.sync_path_transform();
        self.path.line_to(x, y);
    }

    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
        self.path.close_path();
    }

    pub fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        log::debug!(target: "canvas", "quadraticCurveTo {:?}", params);
        self.sync_path_transform();
        self.path.quadratic_curve_to(params);
    }

    pub fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        log::debug!(target: "canvas", "bezierCurveTo {:?}", params);
        self.sync_path_transform();
        self.path.bezier_curve_to(params);
    }

    /// Add a closed rectangle subpath.
    pub fn rect(&mut self, params: &RectParams) {
        log::debug!(target: "canvas", "rect {:?}", params);
        self.sync_path_transform();
        self.path.rect(params);
    }

    pub fn arc(&mut self, params: &ArcParams) {
        log::debug!(target: "canvas", "arc {:?}", params);
        self.sync_path_transform();
        self.path.arc(params);
    }

    pub fn ellipse(&mut self, params: &EllipseParams) {
        log::debug!(target: "canvas", "ellipse {:?}", params);
        self.sync_path_transform();
        self.path.ellipse(params);
    }

    fn sync_path_transform(&mut self) {
        self.path.set_point_transform(self.state.transform);
    }
}

#[cfg(test)]
mod tests {
    use crate::context::tests::test_context;
    use crate::geometry::{ArcParams, RectParams};
    use tiny_skia::PathSegment;

    #[test]
    fn test_points_use_transform_at_insertion() {
        let mut ctx = test_context(10, 10);
        ctx.translate(5.0, 0.0);
        ctx.move_to(0.0, 0.0);
        ctx.reset_transform();
        ctx.line_to(0.0, 0.0);
        let path = ctx.path.to_path().unwrap();
        let points: Vec<_> = path.points().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(points, vec![(5.0, 0.0), (0.0, 0.0)]);
    }

    #[test]
    fn test_begin_path_clears() {
        let mut ctx = test_context(10, 10);
        ctx.rect(&RectParams {
            x: 0.0,
            y: 0.0,
            width: 5.0,
            height: 5.0,
        });
        assert!(ctx.path.to_path().is_some());
        ctx.begin_path();
        assert!(ctx.path.to_path().is_none());
    }

    #[test]
    fn test_arc_connects_to_current_point() {
        let mut ctx = test_context(10, 10);
        ctx.move_to(0.0, 0.0);
        ctx.arc(&ArcParams {
            x: 5.0,
            y: 5.0,
            radius: 2.0,
            start_angle: 0.0,
            end_angle: std::f32::consts::PI,
            anticlockwise: false,
        });
        let path = ctx.path.to_path().unwrap();
        let moves = path
            .segments()
            .filter(|s| matches!(s, PathSegment::MoveTo(_)))
            .count();
        assert_eq!(moves, 1);
    }
}
