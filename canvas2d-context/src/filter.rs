//! Filter primitives and their raster implementations.
//!
//! Color operations run on unpremultiplied channel values so semi-transparent
//! pixels keep their hue.

use tiny_skia::{BlendMode, Color, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

/// Per-pixel color adjustment selected by a filter function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFilterOp {
    Brightness,
    Contrast,
    Grayscale,
    Invert,
    Opacity,
    Saturate,
    Sepia,
}

impl ColorFilterOp {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "brightness" => ColorFilterOp::Brightness,
            "contrast" => ColorFilterOp::Contrast,
            "grayscale" => ColorFilterOp::Grayscale,
            "invert" => ColorFilterOp::Invert,
            "opacity" => ColorFilterOp::Opacity,
            "saturate" => ColorFilterOp::Saturate,
            "sepia" => ColorFilterOp::Sepia,
            _ => return None,
        })
    }

    /// Whether amounts above 1 are clamped to 1.
    pub(crate) fn clamps_to_one(self) -> bool {
        matches!(
            self,
            ColorFilterOp::Grayscale
                | ColorFilterOp::Invert
                | ColorFilterOp::Opacity
                | ColorFilterOp::Sepia
        )
    }
}

/// A resolved filter chain.
///
/// Chains are built by wrapping: `Compose { outer, inner }` applies `inner`
/// first, then `outer`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Gaussian blur with the given standard deviation in pixels.
    Blur { radius: f32 },
    Color { operation: ColorFilterOp, amount: f32 },
    HueRotate { degrees: f32 },
    DropShadow {
        offset_x: f32,
        offset_y: f32,
        radius: f32,
        color: Color,
    },
    Compose { outer: Box<Filter>, inner: Box<Filter> },
}

impl Filter {
    /// Wrap `inner` (the chain so far, if any) with `self`.
    pub fn compose_over(self, inner: Option<Filter>) -> Filter {
        match inner {
            Some(inner) => Filter::Compose {
                outer: Box::new(self),
                inner: Box::new(inner),
            },
            None => self,
        }
    }

    /// Primitives in application order.
    pub fn primitives(&self) -> Vec<&Filter> {
        match self {
            Filter::Compose { outer, inner } => {
                let mut list = inner.primitives();
                list.extend(outer.primitives());
                list
            }
            other => vec![other],
        }
    }

    /// Apply the chain to a premultiplied pixmap in place.
    pub fn apply(&self, pixmap: &mut Pixmap) {
        match self {
            Filter::Compose { outer, inner } => {
                inner.apply(pixmap);
                outer.apply(pixmap);
            }
            Filter::Blur { radius } => gaussian_blur(pixmap, *radius),
            Filter::HueRotate { degrees } => {
                map_unpremultiplied(pixmap, |rgb, a| (hue_rotate(rgb, *degrees), a))
            }
            Filter::Color { operation, amount } => apply_color_op(pixmap, *operation, *amount),
            Filter::DropShadow {
                offset_x,
                offset_y,
                radius,
                color,
            } => drop_shadow(pixmap, *offset_x, *offset_y, *radius, *color),
        }
    }
}

fn apply_color_op(pixmap: &mut Pixmap, op: ColorFilterOp, amount: f32) {
    let amount = if op.clamps_to_one() {
        amount.min(1.0)
    } else {
        amount
    };
    match op {
        ColorFilterOp::Brightness => map_unpremultiplied(pixmap, |c, a| (c.map(|v| v * amount), a)),
        ColorFilterOp::Contrast => {
            map_unpremultiplied(pixmap, |c, a| (c.map(|v| (v - 0.5) * amount + 0.5), a))
        }
        ColorFilterOp::Grayscale => map_unpremultiplied(pixmap, |c, a| {
            let gray = c[0] * 0.2126 + c[1] * 0.7152 + c[2] * 0.0722;
            (c.map(|v| v + (gray - v) * amount), a)
        }),
        ColorFilterOp::Invert => {
            map_unpremultiplied(pixmap, |c, a| (c.map(|v| v + (1.0 - 2.0 * v) * amount), a))
        }
        ColorFilterOp::Opacity => map_unpremultiplied(pixmap, |c, a| (c, a * amount)),
        ColorFilterOp::Saturate => map_unpremultiplied(pixmap, |c, a| (saturate(c, amount), a)),
        ColorFilterOp::Sepia => map_unpremultiplied(pixmap, |c, a| {
            let s = [
                c[0] * 0.393 + c[1] * 0.769 + c[2] * 0.189,
                c[0] * 0.349 + c[1] * 0.686 + c[2] * 0.168,
                c[0] * 0.272 + c[1] * 0.534 + c[2] * 0.131,
            ];
            (
                [
                    c[0] + (s[0] - c[0]) * amount,
                    c[1] + (s[1] - c[1]) * amount,
                    c[2] + (s[2] - c[2]) * amount,
                ],
                a,
            )
        }),
    }
}

fn map_unpremultiplied<F>(pixmap: &mut Pixmap, f: F)
where
    F: Fn([f32; 3], f32) -> ([f32; 3], f32),
{
    for px in pixmap.pixels_mut() {
        let alpha = px.alpha() as f32 / 255.0;
        if alpha == 0.0 {
            continue;
        }
        let rgb = [
            px.red() as f32 / 255.0 / alpha,
            px.green() as f32 / 255.0 / alpha,
            px.blue() as f32 / 255.0 / alpha,
        ];
        let (rgb, alpha) = f(rgb, alpha);
        let alpha = alpha.clamp(0.0, 1.0);
        let channel = |v: f32| (v.clamp(0.0, 1.0) * alpha * 255.0).round() as u8;
        *px = PremultipliedColorU8::from_rgba(
            channel(rgb[0]),
            channel(rgb[1]),
            channel(rgb[2]),
            (alpha * 255.0).round() as u8,
        )
        .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
}

fn saturate(c: [f32; 3], s: f32) -> [f32; 3] {
    let (rw, gw, bw) = (0.213, 0.715, 0.072);
    [
        (rw + (1.0 - rw) * s) * c[0] + (gw - gw * s) * c[1] + (bw - bw * s) * c[2],
        (rw - rw * s) * c[0] + (gw + (1.0 - gw) * s) * c[1] + (bw - bw * s) * c[2],
        (rw - rw * s) * c[0] + (gw - gw * s) * c[1] + (bw + (1.0 - bw) * s) * c[2],
    ]
}

fn hue_rotate(c: [f32; 3], degrees: f32) -> [f32; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        c[0] * (0.213 + cos * 0.787 - sin * 0.213)
            + c[1] * (0.715 - 0.715 * cos - 0.715 * sin)
            + c[2] * (0.072 - 0.072 * cos + 0.928 * sin),
        c[0] * (0.213 - 0.213 * cos + 0.143 * sin)
            + c[1] * (0.715 + 0.285 * cos + 0.140 * sin)
            + c[2] * (0.072 - 0.072 * cos - 0.283 * sin),
        c[0] * (0.213 - 0.213 * cos - 0.787 * sin)
            + c[1] * (0.715 - 0.715 * cos + 0.715 * sin)
            + c[2] * (0.072 + 0.928 * cos + 0.072 * sin),
    ]
}

/// Normalized kernel covering three standard deviations, capped at
/// `max_radius` taps on each side.
fn gaussian_kernel(sigma: f32, max_radius: usize) -> Vec<f32> {
    let radius = (sigma.abs() * 3.0).ceil().min(max_radius as f32) as usize;
    let two_sigma_sq = 2.0 * sigma * sigma;
    if radius == 0 || two_sigma_sq <= 0.0 {
        return Vec::new();
    }
    let mut kernel: Vec<f32> = (0..=radius.saturating_mul(2))
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Separable Gaussian blur of a premultiplied pixmap. Pixels outside the
/// pixmap count as transparent.
pub(crate) fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    // Taps further out than the pixmap only ever sample transparent pixels.
    let max_radius = pixmap.width().max(pixmap.height()) as usize;
    let kernel = gaussian_kernel(sigma, max_radius);
    if kernel.is_empty() {
        return;
    }
    let radius = (kernel.len() / 2) as isize;
    let width = pixmap.width() as isize;
    let height = pixmap.height() as isize;

    let src: Vec<[f32; 4]> = pixmap
        .pixels()
        .iter()
        .map(|p| {
            [
                p.red() as f32,
                p.green() as f32,
                p.blue() as f32,
                p.alpha() as f32,
            ]
        })
        .collect();

    let pass = |input: &[[f32; 4]], horizontal: bool| -> Vec<[f32; 4]> {
        let mut out = vec![[0.0f32; 4]; input.len()];
        for y in 0..height {
            for x in 0..width {
                let mut acc = [0.0f32; 4];
                for (i, weight) in kernel.iter().enumerate() {
                    let offset = i as isize - radius;
                    let (sx, sy) = if horizontal {
                        (x + offset, y)
                    } else {
                        (x, y + offset)
                    };
                    if sx < 0 || sy < 0 || sx >= width || sy >= height {
                        continue;
                    }
                    let sample = input[(sy * width + sx) as usize];
                    for c in 0..4 {
                        acc[c] += sample[c] * weight;
                    }
                }
                out[(y * width + x) as usize] = acc;
            }
        }
        out
    };

    let blurred = pass(&pass(&src, true), false);
    for (px, v) in pixmap.pixels_mut().iter_mut().zip(blurred) {
        let a = v[3].round().clamp(0.0, 255.0) as u8;
        let channel = |c: f32| (c.round().clamp(0.0, 255.0) as u8).min(a);
        *px = PremultipliedColorU8::from_rgba(channel(v[0]), channel(v[1]), channel(v[2]), a)
            .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
}

/// Replace every pixel's color with `color`, scaling the color's alpha by the
/// pixel's coverage.
pub(crate) fn tint_alpha(pixmap: &mut Pixmap, color: Color) {
    for px in pixmap.pixels_mut() {
        let coverage = px.alpha() as f32 / 255.0;
        let alpha = color.alpha() * coverage;
        *px = PremultipliedColorU8::from_rgba(
            (color.red() * alpha * 255.0).round() as u8,
            (color.green() * alpha * 255.0).round() as u8,
            (color.blue() * alpha * 255.0).round() as u8,
            (alpha * 255.0).round() as u8,
        )
        .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }
}

fn drop_shadow(pixmap: &mut Pixmap, offset_x: f32, offset_y: f32, radius: f32, color: Color) {
    let mut shadow = pixmap.clone();
    tint_alpha(&mut shadow, color);
    gaussian_blur(&mut shadow, radius);

    let Some(mut result) = Pixmap::new(pixmap.width(), pixmap.height()) else {
        return;
    };
    let paint = PixmapPaint {
        blend_mode: BlendMode::SourceOver,
        ..PixmapPaint::default()
    };
    result.draw_pixmap(
        0,
        0,
        shadow.as_ref(),
        &paint,
        Transform::from_translate(offset_x, offset_y),
        None,
    );
    result.draw_pixmap(0, 0, pixmap.as_ref(), &paint, Transform::identity(), None);
    *pixmap = result;
}
