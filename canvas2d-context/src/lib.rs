//! Immediate-mode Canvas 2D rendering context in pure Rust.
//!
//! A `Canvas2dContext` owns a drawing-state stack, a current path and a
//! lazily allocated backing surface. It uses:
//! - `tiny-skia` for rasterization, compositing and the surface itself
//! - `cosmic-text` for text shaping and glyph outlines
//! - `fontdb` for the font database fed into the shaper
//! - `kurbo` for arc flattening and point-in-path queries
//!
//! # Example
//!
//! ```rust,ignore
//! use canvas2d_context::Canvas2dContext;
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
//! ctx.set_shadow_blur(4.0);
//! ctx.fill_rect(10.0, 10.0, 100.0, 50.0);
//! let pixels = ctx.get_image_data(10, 10, 100, 50, None)?;
//! let png_data = ctx.to_png(None)?;
//! ```

mod arc;
mod composite;
mod context;
mod drawing_state;
mod error;
mod filter;
mod filter_parser;
mod font_config;
mod font_parser;
mod geometry;
mod host;
mod image_data;
mod image_source;
mod painter;
mod path2d;
mod settings;
mod style;
mod text;

// Re-export public API
pub use composite::CompositeOperator;
pub use context::{compute_draw_rects, Canvas2dContext, Canvas2dContextBuilder};
pub use drawing_state::{ClipPath, DrawingState};
pub use error::{Canvas2dError, Canvas2dResult};
pub use filter::{ColorFilterOp, Filter};
pub use filter_parser::parse_filter;
pub use font_config::{font_config_to_fontdb, CustomFont, FontConfig, GenericFamilyMap};
pub use font_parser::{parse_font, ParsedFont};
pub use geometry::{
    ArcParams, CubicBezierParams, DirtyRect, EllipseParams, FloatRect, ImageCropParams,
    QuadraticBezierParams, RectParams,
};
pub use host::CanvasHost;
pub use image_data::{ImageData, ImageDataSettings};
pub use image_source::{
    CanvasImageSource, ImageBitmap, ImageElement, Usability, VideoFrame, VideoReadyState,
};
pub use path2d::Path2D;
pub use settings::{
    CanvasColorType, CanvasRenderingContext2DSettings, CanvasSettingsInit, PredefinedColorSpace,
};
pub use style::{
    parse_fill_rule, CanvasFillRule, ImageSmoothingQuality, LineCap, LineJoin, TextAlign,
    TextBaseline,
};
pub use text::TextMetrics;
