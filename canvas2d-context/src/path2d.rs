//! Path building shared by the context's default path and `Path2D` objects.
//!
//! Points pass through a point transform as they are added. `Path2D` objects
//! keep it at identity and so stay in user space; the context's default path
//! uses the current transform, so its points land in device space.

use crate::arc;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{
    ArcParams, CubicBezierParams, EllipseParams, QuadraticBezierParams, RectParams,
};
use crate::style::CanvasFillRule;
use kurbo::{BezPath, Shape};
use tiny_skia::{Path, PathBuilder, PathSegment, Point, Transform};

/// A reusable path.
#[derive(Debug, Clone)]
pub struct Path2D {
    builder: PathBuilder,
    point_transform: Transform,
    /// Start of the current subpath, in stored coordinates.
    subpath_start: Option<Point>,
}

impl Default for Path2D {
    fn default() -> Self {
        Self::new()
    }
}

impl Path2D {
    pub fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            point_transform: Transform::identity(),
            subpath_start: None,
        }
    }

    /// Parse SVG path data. Arcs become cubic curves.
    pub fn from_svg_path_data(path_data: &str) -> Canvas2dResult<Self> {
        let mut path = Path2D::new();
        for segment in svgtypes::SimplifyingPathParser::from(path_data) {
            let segment = segment
                .map_err(|e| Canvas2dError::PathError(format!("invalid SVG path data: {e:?}")))?;
            match segment {
                svgtypes::SimplePathSegment::MoveTo { x, y } => path.move_to(x as f32, y as f32),
                svgtypes::SimplePathSegment::LineTo { x, y } => path.line_to(x as f32, y as f32),
                svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    path.quadratic_curve_to(&QuadraticBezierParams {
                        cpx: x1 as f32,
                        cpy: y1 as f32,
                        x: x as f32,
                        y: y as f32,
                    })
                }
                svgtypes::SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => path.bezier_curve_to(&CubicBezierParams {
                    cp1x: x1 as f32,
                    cp1y: y1 as f32,
                    cp2x: x2 as f32,
                    cp2y: y2 as f32,
                    x: x as f32,
                    y: y as f32,
                }),
                svgtypes::SimplePathSegment::ClosePath => path.close_path(),
            }
        }
        Ok(path)
    }

    pub(crate) fn set_point_transform(&mut self, transform: Transform) {
        self.point_transform = transform;
    }

    fn map(&self, x: f32, y: f32) -> Point {
        let mut points = [Point::from_xy(x, y)];
        self.point_transform.map_points(&mut points);
        points[0]
    }

    fn has_current_point(&self) -> bool {
        self.subpath_start.is_some()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let p = self.map(x, y);
        self.builder.move_to(p.x, p.y);
        self.subpath_start = Some(p);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        if !self.has_current_point() {
            self.move_to(x, y);
            return;
        }
        let p = self.map(x, y);
        self.builder.line_to(p.x, p.y);
    }

    pub fn close_path(&mut self) {
        if let Some(start) = self.subpath_start {
            self.builder.close();
            // A new subpath begins where the closed one started.
            self.builder.move_to(start.x, start.y);
        }
    }

    pub fn quadratic_curve_to(&mut self, params: &QuadraticBezierParams) {
        let values = [params.cpx, params.cpy, params.x, params.y];
        if values.iter().any(|v| !v.is_finite()) {
            return;
        }
        if !self.has_current_point() {
            self.move_to(params.cpx, params.cpy);
        }
        let c = self.map(params.cpx, params.cpy);
        let p = self.map(params.x, params.y);
        self.builder.quad_to(c.x, c.y, p.x, p.y);
    }

    pub fn bezier_curve_to(&mut self, params: &CubicBezierParams) {
        let values = [
            params.cp1x,
            params.cp1y,
            params.cp2x,
            params.cp2y,
            params.x,
            params.y,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return;
        }
        if !self.has_current_point() {
            self.move_to(params.cp1x, params.cp1y);
        }
        let c1 = self.map(params.cp1x, params.cp1y);
        let c2 = self.map(params.cp2x, params.cp2y);
        let p = self.map(params.x, params.y);
        self.builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
    }

    pub fn rect(&mut self, params: &RectParams) {
        let values = [params.x, params.y, params.width, params.height];
        if values.iter().any(|v| !v.is_finite()) {
            return;
        }
        let RectParams {
            x,
            y,
            width,
            height,
        } = *params;
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }

    pub fn arc(&mut self, params: &ArcParams) {
        let mut segment = PathBuilder::new();
        arc::arc(&mut segment, params, false);
        self.push_segment(segment);
    }

    pub fn ellipse(&mut self, params: &EllipseParams) {
        let mut segment = PathBuilder::new();
        arc::ellipse(&mut segment, params, false);
        self.push_segment(segment);
    }

    /// Append the subpaths of `other`, mapped by `transform` first.
    pub fn add_path(&mut self, other: &Path2D, transform: Option<Transform>) {
        let Some(path) = other.to_path() else {
            return;
        };
        let path = match transform {
            Some(t) => match path.transform(t) {
                Some(path) => path,
                None => return,
            },
            None => path,
        };
        let Some(path) = path.transform(self.point_transform) else {
            return;
        };
        for segment in path.segments() {
            match segment {
                PathSegment::MoveTo(p) => {
                    self.builder.move_to(p.x, p.y);
                    self.subpath_start = Some(p);
                }
                PathSegment::LineTo(p) => self.builder.line_to(p.x, p.y),
                PathSegment::QuadTo(c, p) => self.builder.quad_to(c.x, c.y, p.x, p.y),
                PathSegment::CubicTo(c1, c2, p) => {
                    self.builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathSegment::Close => self.builder.close(),
            }
        }
    }

    /// Append a user-space arc segment, joining it to the current point.
    fn push_segment(&mut self, segment: PathBuilder) {
        let Some(path) = segment
            .finish()
            .and_then(|p| p.transform(self.point_transform))
        else {
            return;
        };
        for seg in path.segments() {
            match seg {
                PathSegment::MoveTo(p) if self.has_current_point() => {
                    self.builder.line_to(p.x, p.y)
                }
                PathSegment::MoveTo(p) => {
                    self.builder.move_to(p.x, p.y);
                    self.subpath_start = Some(p);
                }
                PathSegment::LineTo(p) => self.builder.line_to(p.x, p.y),
                PathSegment::QuadTo(c, p) => self.builder.quad_to(c.x, c.y, p.x, p.y),
                PathSegment::CubicTo(c1, c2, p) => {
                    self.builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathSegment::Close => self.builder.close(),
            }
        }
    }

    /// The path so far, or `None` when it has no drawable segment.
    pub(crate) fn to_path(&self) -> Option<Path> {
        self.builder.clone().finish()
    }

    pub(crate) fn clear(&mut self) {
        self.builder.clear();
        self.subpath_start = None;
    }
}

/// Copy of `path` with every subpath closed.
pub(crate) fn close_subpaths(path: &Path) -> Option<Path> {
    let mut builder = PathBuilder::new();
    let mut open = false;
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                if open {
                    builder.close();
                }
                builder.move_to(p.x, p.y);
                open = false;
            }
            PathSegment::LineTo(p) => {
                builder.line_to(p.x, p.y);
                open = true;
            }
            PathSegment::QuadTo(c, p) => {
                builder.quad_to(c.x, c.y, p.x, p.y);
                open = true;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                open = true;
            }
            PathSegment::Close => {
                builder.close();
                open = false;
            }
        }
    }
    if open {
        builder.close();
    }
    builder.finish()
}

/// Whether `(x, y)` is inside the closed `path` under `rule`.
pub(crate) fn contains_point(path: &Path, x: f64, y: f64, rule: CanvasFillRule) -> bool {
    let mut bez = BezPath::new();
    let pt = |p: Point| kurbo::Point::new(p.x as f64, p.y as f64);
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => bez.move_to(pt(p)),
            PathSegment::LineTo(p) => bez.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => bez.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => bez.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => bez.close_path(),
        }
    }
    let winding = bez.winding(kurbo::Point::new(x, y));
    match rule {
        CanvasFillRule::NonZero => winding != 0,
        CanvasFillRule::EvenOdd => winding % 2 != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &Path2D) -> Vec<PathSegment> {
        path.to_path().map(|p| p.segments().collect()).unwrap_or_default()
    }

    fn square(size: f32) -> Path2D {
        let mut path = Path2D::new();
        path.rect(&RectParams {
            x: 0.0,
            y: 0.0,
            width: size,
            height: size,
        });
        path
    }

    #[test]
    fn test_empty_and_move_only() {
        assert!(Path2D::new().to_path().is_none());
        let mut path = Path2D::new();
        path.move_to(1.0, 1.0);
        assert!(path.to_path().is_none());
    }

    #[test]
    fn test_line_to_without_current_point_moves() {
        let mut path = Path2D::new();
        path.line_to(5.0, 5.0);
        path.line_to(10.0, 5.0);
        let segs = segments(&path);
        assert_eq!(segs[0], PathSegment::MoveTo(Point::from_xy(5.0, 5.0)));
        assert_eq!(segs[1], PathSegment::LineTo(Point::from_xy(10.0, 5.0)));
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0);
        path.line_to(f32::NAN, 1.0);
        path.line_to(1.0, f32::INFINITY);
        assert!(path.to_path().is_none());
    }

    #[test]
    fn test_point_transform_applies() {
        let mut path = Path2D::new();
        path.set_point_transform(Transform::from_translate(10.0, 20.0));
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 0.0);
        assert_eq!(
            segments(&path)[1],
            PathSegment::LineTo(Point::from_xy(11.0, 20.0))
        );
    }

    #[test]
    fn test_svg_path_data() {
        let path = Path2D::from_svg_path_data("M10 10 h 20 v 20 A 5 5 0 0 1 20 40 Z").unwrap();
        assert!(segments(&path)
            .iter()
            .any(|s| matches!(s, PathSegment::CubicTo(..))));
        assert!(matches!(
            Path2D::from_svg_path_data("not valid path data"),
            Err(Canvas2dError::PathError(_))
        ));
    }

    #[test]
    fn test_close_subpaths_closes_open_paths() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.move_to(20.0, 0.0);
        path.line_to(30.0, 0.0);
        path.line_to(30.0, 10.0);
        let closed = close_subpaths(&path.to_path().unwrap()).unwrap();
        let closes = closed
            .segments()
            .filter(|s| *s == PathSegment::Close)
            .count();
        assert_eq!(closes, 2);
    }

    #[test]
    fn test_contains_point_rules() {
        // Two nested squares wound the same way.
        let mut path = square(10.0);
        path.add_path(
            &square(4.0),
            Some(Transform::from_translate(3.0, 3.0)),
        );
        let path = path.to_path().unwrap();
        assert!(contains_point(&path, 5.0, 5.0, CanvasFillRule::NonZero));
        assert!(!contains_point(&path, 5.0, 5.0, CanvasFillRule::EvenOdd));
        assert!(contains_point(&path, 1.0, 1.0, CanvasFillRule::EvenOdd));
        assert!(!contains_point(&path, 20.0, 20.0, CanvasFillRule::NonZero));
    }

    #[test]
    fn test_arc_joins_current_point() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0);
        path.arc(&ArcParams {
            x: 50.0,
            y: 50.0,
            radius: 10.0,
            start_angle: 0.0,
            end_angle: std::f32::consts::PI,
            anticlockwise: false,
        });
        let segs = segments(&path);
        assert_eq!(segs[1], PathSegment::LineTo(Point::from_xy(60.0, 50.0)));
    }
}
