//! Integration tests for canvas2d-context.

use canvas2d_context::{
    Canvas2dContext, Canvas2dError, CanvasFillRule, CanvasHost, CanvasImageSource,
    CanvasSettingsInit, CustomFont, DrawingState, FloatRect, FontConfig, ImageBitmap,
    ImageCropParams, ImageElement, Path2D, RectParams, TextAlign, TextBaseline,
};
use rstest::rstest;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Once};
use tiny_skia::{Color, Pixmap};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn context(width: u32, height: u32) -> Canvas2dContext {
    init_logging();
    Canvas2dContext::builder()
        .size(width, height)
        .font_config(FontConfig {
            load_system_fonts: false,
            ..Default::default()
        })
        .build()
        .unwrap()
}

const DEJAVU_SANS: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

fn text_context(width: u32, height: u32) -> Canvas2dContext {
    init_logging();
    let mut ctx = Canvas2dContext::builder()
        .size(width, height)
        .font_config(FontConfig {
            load_system_fonts: false,
            custom_fonts: vec![CustomFont {
                data: Arc::new(DEJAVU_SANS.to_vec()),
            }],
            ..Default::default()
        })
        .build()
        .unwrap();
    ctx.set_font("20px \"DejaVu Sans\"").unwrap();
    ctx
}

/// Inclusive `(min_x, min_y, max_x, max_y)` of all pixels with any coverage.
fn coverage_bounds(ctx: &Canvas2dContext) -> Option<(i32, i32, i32, i32)> {
    let (width, height) = (ctx.width() as i32, ctx.height() as i32);
    let data = ctx.get_image_data(0, 0, width, height, None).unwrap();
    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for (i, px) in data.data().chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = (i as i32 % width, i as i32 / width);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

fn rgba_at(ctx: &Canvas2dContext, x: i32, y: i32) -> [u8; 4] {
    let data = ctx.get_image_data(x, y, 1, 1, None).unwrap();
    let d = data.data();
    [d[0], d[1], d[2], d[3]]
}

fn solid_pixmap(width: u32, height: u32, color: Color) -> Pixmap {
    let mut pixmap = Pixmap::new(width, height).unwrap();
    pixmap.fill(color);
    pixmap
}

#[derive(Default)]
struct Recorder {
    rects: RefCell<Vec<FloatRect>>,
}

impl CanvasHost for Recorder {
    fn needs_redraw(&self, rect: FloatRect) {
        self.rects.borrow_mut().push(rect);
    }
}

#[rstest]
#[case(32768, 10)]
#[case(10, 40000)]
fn test_oversized_surface_is_rejected(#[case] width: u32, #[case] height: u32) {
    init_logging();
    assert!(matches!(
        Canvas2dContext::new(width, height),
        Err(Canvas2dError::InvalidDimensions { .. })
    ));
}

#[rstest]
#[case(Some("rec2020"), None)]
#[case(None, Some("rgba8"))]
fn test_unknown_settings_are_type_errors(
    #[case] color_space: Option<&str>,
    #[case] color_type: Option<&str>,
) {
    init_logging();
    let settings = CanvasSettingsInit {
        color_space: color_space.map(String::from),
        color_type: color_type.map(String::from),
        ..Default::default()
    };
    assert!(matches!(
        Canvas2dContext::with_settings(10, 10, settings),
        Err(Canvas2dError::Type(_))
    ));
}

#[test]
fn test_fill_rect_reads_back_fill_color() {
    let mut ctx = context(50, 50);
    ctx.set_fill_style("#3366cc").unwrap();
    ctx.fill_rect(10.0, 10.0, 20.0, 20.0);
    let data = ctx.get_image_data(10, 10, 20, 20, None).unwrap();
    for px in data.data().chunks_exact(4) {
        assert_eq!(px, [0x33, 0x66, 0xcc, 0xff]);
    }
    assert_eq!(rgba_at(&ctx, 5, 5), [0, 0, 0, 0]);
}

#[test]
fn test_save_restore_preserves_state() {
    let mut ctx = context(10, 10);
    ctx.set_line_width(3.0);
    ctx.set_filter("blur(2px)");
    let before: DrawingState = ctx.drawing_state().clone();
    ctx.save();
    ctx.restore();
    assert_eq!(ctx.drawing_state(), &before);
}

#[test]
fn test_taint_is_monotonic() {
    let mut ctx = context(20, 20);
    let foreign = ImageElement::from_pixmap(solid_pixmap(4, 4, Color::WHITE)).cross_origin();
    ctx.draw_image(&CanvasImageSource::Image(&foreign), 0.0, 0.0)
        .unwrap();
    assert!(!ctx.origin_clean());

    let local = ImageElement::from_pixmap(solid_pixmap(4, 4, Color::WHITE));
    ctx.draw_image(&CanvasImageSource::Image(&local), 0.0, 0.0)
        .unwrap();
    ctx.clear_rect(0.0, 0.0, 20.0, 20.0);
    ctx.reset();
    assert!(!ctx.origin_clean());

    let err = ctx.get_image_data(0, 0, 5, 5, None).unwrap_err();
    match err {
        Canvas2dError::Security(msg) => assert!(msg.contains("origin-clean")),
        other => panic!("expected a security error, got {other:?}"),
    }
}

#[test]
fn test_copy_operator_paints_no_shadow() {
    let mut ctx = context(40, 40);
    ctx.set_shadow_color("blue");
    ctx.set_shadow_offset_x(20.0);
    ctx.set_shadow_offset_y(20.0);
    ctx.set_global_composite_operation("copy");
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(rgba_at(&ctx, 25, 25), [0, 0, 0, 0]);
    assert_eq!(rgba_at(&ctx, 5, 5), [0, 0, 0, 255]);
}

#[test]
fn test_visible_shadow_is_painted() {
    let mut ctx = context(40, 40);
    ctx.set_shadow_color("blue");
    ctx.set_shadow_offset_x(20.0);
    ctx.set_shadow_offset_y(20.0);
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(rgba_at(&ctx, 25, 25), [0, 0, 255, 255]);
}

#[test]
fn test_transparent_shadow_color_paints_nothing() {
    let mut ctx = context(40, 40);
    ctx.set_shadow_offset_x(20.0);
    ctx.set_shadow_blur(4.0);
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(rgba_at(&ctx, 25, 5), [0, 0, 0, 0]);
}

#[test]
fn test_draw_image_clips_source_proportionally() {
    let mut ctx = context(200, 200);
    let image = ImageElement::from_pixmap(solid_pixmap(100, 100, Color::from_rgba8(255, 0, 0, 255)));
    ctx.draw_image_cropped(
        &CanvasImageSource::Image(&image),
        &ImageCropParams {
            sx: 50.0,
            sy: 50.0,
            sw: 100.0,
            sh: 100.0,
            dx: 0.0,
            dy: 0.0,
            dw: 200.0,
            dh: 200.0,
        },
    )
    .unwrap();
    assert_eq!(rgba_at(&ctx, 50, 50), [255, 0, 0, 255]);
    assert_eq!(rgba_at(&ctx, 150, 150), [0, 0, 0, 0]);
    assert_eq!(rgba_at(&ctx, 150, 50), [0, 0, 0, 0]);
}

#[test]
fn test_put_get_round_trip() {
    let mut ctx = context(16, 16);
    ctx.set_fill_style("rgba(200, 100, 50, 0.3)").unwrap();
    ctx.fill_rect(2.0, 2.0, 10.0, 10.0);
    ctx.set_fill_style("rgba(10, 240, 90, 0.7)").unwrap();
    ctx.begin_path();
    ctx.arc(&canvas2d_context::ArcParams {
        x: 8.0,
        y: 8.0,
        radius: 5.0,
        start_angle: 0.0,
        end_angle: std::f32::consts::TAU,
        anticlockwise: false,
    });
    ctx.fill();

    let before = ctx.get_image_data(0, 0, 16, 16, None).unwrap();
    ctx.put_image_data(&before, 0, 0);
    let after = ctx.get_image_data(0, 0, 16, 16, None).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_invalid_filter_keeps_previous() {
    let mut ctx = context(10, 10);
    ctx.set_filter("grayscale(50%) blur(1px)");
    ctx.set_filter("blur(");
    assert_eq!(ctx.filter(), "grayscale(50%) blur(1px)");
    ctx.set_filter("none");
    assert_eq!(ctx.filter(), "none");
}

#[test]
fn test_opaque_context_clears_to_black() {
    init_logging();
    let mut ctx = Canvas2dContext::builder()
        .size(10, 10)
        .settings(CanvasSettingsInit {
            alpha: Some(false),
            ..Default::default()
        })
        .font_config(FontConfig {
            load_system_fonts: false,
            ..Default::default()
        })
        .build()
        .unwrap();
    ctx.set_fill_style("white").unwrap();
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    ctx.clear_rect(0.0, 0.0, 5.0, 10.0);
    assert_eq!(rgba_at(&ctx, 2, 2), [0, 0, 0, 255]);
    assert_eq!(rgba_at(&ctx, 7, 2), [255, 255, 255, 255]);
}

#[test]
fn test_host_receives_invalidations() {
    let recorder = Rc::new(Recorder::default());
    let host: Rc<dyn CanvasHost> = recorder.clone();
    init_logging();
    let mut ctx = Canvas2dContext::builder()
        .size(100, 100)
        .host(&host)
        .font_config(FontConfig {
            load_system_fonts: false,
            ..Default::default()
        })
        .build()
        .unwrap();
    ctx.fill_rect(10.0, 10.0, 10.0, 10.0);
    ctx.reset();
    let rects = recorder.rects.borrow();
    assert_eq!(rects.len(), 2);
    assert!(rects[0].x <= 10.0 && rects[0].right() >= 20.0);
    assert!(rects[0].width < 100.0);
    assert_eq!(rects[1], FloatRect::new(0.0, 0.0, 100.0, 100.0));
}

#[test]
fn test_detached_bitmap_and_empty_canvas_are_invalid_state() {
    let mut ctx = context(10, 10);
    let mut bitmap = ImageBitmap::new(solid_pixmap(2, 2, Color::BLACK), true);
    bitmap.close();
    assert!(matches!(
        ctx.draw_image(&CanvasImageSource::Bitmap(&bitmap), 0.0, 0.0),
        Err(Canvas2dError::InvalidState(_))
    ));

    let empty = context(0, 10);
    assert!(matches!(
        ctx.draw_image(&CanvasImageSource::Canvas(&empty), 0.0, 0.0),
        Err(Canvas2dError::InvalidState(_))
    ));
}

#[test]
fn test_path2d_fill_and_hit_test() {
    let mut ctx = context(60, 60);
    let path = Path2D::from_svg_path_data("M0 0 H20 V20 H0 Z").unwrap();
    ctx.translate(30.0, 30.0);
    ctx.set_fill_style("lime").unwrap();
    ctx.fill_path2d(&path, CanvasFillRule::NonZero);
    assert!(ctx.is_point_in_path2d(&path, 40.0, 40.0, CanvasFillRule::NonZero));
    assert_eq!(rgba_at(&ctx, 40, 40), [0, 255, 0, 255]);
    assert_eq!(rgba_at(&ctx, 10, 10), [0, 0, 0, 0]);
}

#[test]
fn test_evenodd_rule_leaves_hole() {
    let mut ctx = context(30, 30);
    let rect = |x: f32, size: f32| RectParams {
        x,
        y: x,
        width: size,
        height: size,
    };
    ctx.rect(&rect(0.0, 30.0));
    ctx.rect(&rect(10.0, 10.0));
    ctx.fill_with_rule(CanvasFillRule::EvenOdd);
    assert_eq!(rgba_at(&ctx, 15, 15)[3], 0);
    assert_eq!(rgba_at(&ctx, 5, 5)[3], 255);
}

#[test]
fn test_png_export_decodes() {
    let mut ctx = context(32, 16);
    ctx.set_fill_style("#ff0000").unwrap();
    ctx.fill_rect(0.0, 0.0, 16.0, 16.0);
    let png_data = ctx.to_png(Some(144.0)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canvas.png");
    std::fs::write(&path, &png_data).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (32, 16));
    assert_eq!(decoded.get_pixel(4, 4).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(24, 4).0, [0, 0, 0, 0]);
}

#[test]
fn test_measure_text_with_loaded_font() {
    let mut ctx = text_context(10, 10);
    let hello = ctx.measure_text("Hello");
    let hello_world = ctx.measure_text("Hello World");
    assert!(hello.width > 0.0);
    assert!(hello_world.width > hello.width);
    assert!(hello.font_bounding_box_ascent > 0.0);
    assert_eq!(hello.actual_bounding_box_left, 0.0);
    assert!((hello.actual_bounding_box_right - hello.width).abs() < 1e-3);
}

#[test]
fn test_fill_and_stroke_text_paint_glyphs() {
    let mut ctx = text_context(200, 60);
    ctx.fill_text("Hello", 10.0, 40.0);
    let (x0, y0, x1, y1) = coverage_bounds(&ctx).expect("fillText painted nothing");
    assert!(x0 >= 10 && x1 > x0 + 20);
    // No descenders, so the glyphs sit on the alphabetic baseline.
    assert!(y0 >= 20 && y1 <= 41);

    let mut ctx = text_context(200, 60);
    ctx.set_line_width(1.0);
    ctx.stroke_text("Hello", 10.0, 40.0);
    assert!(coverage_bounds(&ctx).is_some());
}

#[test]
fn test_max_width_compresses_text() {
    let mut ctx = text_context(300, 60);
    let natural = ctx.measure_text("Hello World").width;
    let max_width = (natural / 2.0).floor();
    ctx.fill_text_max_width("Hello World", 10.0, 40.0, max_width);
    let (x0, _, x1, _) = coverage_bounds(&ctx).expect("fillText painted nothing");
    assert!(x0 >= 9);
    assert!(x1 as f32 <= 10.0 + max_width + 1.0);
    assert!((x1 - x0) as f32 > max_width / 2.0);
}

#[test]
fn test_center_alignment_shifts_by_half_width() {
    let mut left = text_context(300, 60);
    let width = left.measure_text("Hello").width;
    left.fill_text("Hello", 150.0, 40.0);
    let (left_x0, _, left_x1, _) = coverage_bounds(&left).unwrap();

    let mut center = text_context(300, 60);
    center.set_text_align(TextAlign::Center);
    center.fill_text("Hello", 150.0, 40.0);
    let (center_x0, _, center_x1, _) = coverage_bounds(&center).unwrap();

    assert!(((left_x0 - center_x0) as f32 - width / 2.0).abs() <= 1.5);
    assert!(((left_x1 - center_x1) as f32 - width / 2.0).abs() <= 1.5);
}

#[test]
fn test_top_baseline_hangs_text_below_anchor() {
    let mut ctx = text_context(200, 60);
    ctx.set_text_baseline(TextBaseline::Top);
    ctx.fill_text("Hello", 10.0, 0.0);
    let (_, y0, _, y1) = coverage_bounds(&ctx).expect("fillText painted nothing");
    assert!(y0 >= 0);
    assert!(y1 <= 21);
}

#[test]
fn test_huge_shadow_blur_completes() {
    let mut ctx = context(16, 16);
    ctx.set_shadow_color("black");
    ctx.set_shadow_blur(1e30);
    ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
    assert_eq!(rgba_at(&ctx, 1, 1)[3], 255);
}

#[rstest]
#[case("blur(1000000000000000000000000000000px)")]
#[case("blur(1e30px)")]
fn test_huge_filter_blur_completes(#[case] filter: &str) {
    let mut ctx = context(16, 16);
    ctx.set_filter(filter);
    assert_eq!(ctx.filter(), filter);
    ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
    assert!(rgba_at(&ctx, 12, 12)[3] > 0);
}
