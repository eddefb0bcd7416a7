//! Arc and ellipse segments.
//!
//! tiny-skia has no arc primitive, so arcs are converted to cubic beziers
//! with kurbo and appended to a tiny-skia path builder.

use crate::geometry::{ArcParams, EllipseParams};
use kurbo::{PathEl, Shape};
use std::f64::consts::TAU;
use tiny_skia::PathBuilder;

const ARC_TOLERANCE: f64 = 0.1;

/// Append a circular arc. See [`ellipse`].
pub fn arc(path: &mut PathBuilder, params: &ArcParams, connect: bool) {
    ellipse(
        path,
        &EllipseParams {
            x: params.x,
            y: params.y,
            radius_x: params.radius,
            radius_y: params.radius,
            rotation: 0.0,
            start_angle: params.start_angle,
            end_angle: params.end_angle,
            anticlockwise: params.anticlockwise,
        },
        connect,
    );
}

/// Append an elliptical arc.
///
/// When `connect` is true the arc start is joined to the current point with a
/// straight line, otherwise a new subpath starts at the arc start.
pub fn ellipse(path: &mut PathBuilder, params: &EllipseParams, connect: bool) {
    let values = [
        params.x,
        params.y,
        params.radius_x,
        params.radius_y,
        params.rotation,
        params.start_angle,
        params.end_angle,
    ];
    if values.iter().any(|v| !v.is_finite()) || params.radius_x < 0.0 || params.radius_y < 0.0 {
        return;
    }

    let sweep = sweep_angle(
        params.start_angle as f64,
        params.end_angle as f64,
        params.anticlockwise,
    );
    let shape = kurbo::Arc::new(
        (params.x as f64, params.y as f64),
        (params.radius_x as f64, params.radius_y as f64),
        params.start_angle as f64,
        sweep,
        params.rotation as f64,
    );

    for el in shape.path_elements(ARC_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => {
                if connect {
                    path.line_to(p.x as f32, p.y as f32);
                } else {
                    path.move_to(p.x as f32, p.y as f32);
                }
            }
            PathEl::LineTo(p) => path.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => path.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => path.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => path.close(),
        }
    }
}

/// Signed sweep from `start` to `end`, clamped to one full turn.
fn sweep_angle(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise && end - start >= TAU {
        TAU
    } else if anticlockwise && start - end >= TAU {
        -TAU
    } else if anticlockwise {
        -((start - end).rem_euclid(TAU))
    } else {
        (end - start).rem_euclid(TAU)
    }
}
