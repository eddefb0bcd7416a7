//! Parsing of `<filter-value-list>` strings.
//!
//! Only the filter functions are understood; `url()` references and CSS-wide
//! keywords are rejected.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::filter::{ColorFilterOp, Filter};
use crate::font_parser::ROOT_FONT_SIZE_PX;
use crate::style::parse_color;
use tiny_skia::Color;

const CSS_WIDE_KEYWORDS: [&str; 5] = ["inherit", "initial", "unset", "revert", "revert-layer"];

/// Parse a filter list into a chain.
///
/// `font_size_px` resolves `em` lengths. Each function wraps the chain parsed
/// before it.
pub fn parse_filter(input: &str, font_size_px: f32) -> Canvas2dResult<Filter> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(error("empty filter list"));
    }
    if CSS_WIDE_KEYWORDS
        .iter()
        .any(|k| trimmed.eq_ignore_ascii_case(k))
    {
        return Err(error(&format!("keyword {trimmed:?} is not allowed")));
    }

    let mut chain: Option<Filter> = None;
    for (name, args) in split_functions(trimmed)? {
        let primitive = parse_function(&name, &args, font_size_px)?;
        chain = Some(primitive.compose_over(chain));
    }
    chain.ok_or_else(|| error("empty filter list"))
}

fn error(message: &str) -> Canvas2dError {
    Canvas2dError::FilterParseError(message.to_string())
}

/// Split `a(x) b(y z)` into `[("a", "x"), ("b", "y z")]`.
fn split_functions(input: &str) -> Canvas2dResult<Vec<(String, String)>> {
    let mut functions = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| error(&format!("expected a filter function in {rest:?}")))?;
        let name = rest[..open].to_ascii_lowercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(error(&format!("invalid filter function name {name:?}")));
        }

        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in rest[open..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(|| error("unbalanced parentheses"))?;
        functions.push((name, rest[open + 1..close].trim().to_string()));
        rest = rest[close + 1..].trim_start();
    }
    Ok(functions)
}

/// Split on whitespace and commas that are not inside parentheses.
fn split_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        let separator = depth == 0 && c.is_whitespace();
        match (start, separator) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                parts.push(&args[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        parts.push(&args[s..]);
    }
    parts
}

fn parse_function(name: &str, args: &str, font_size_px: f32) -> Canvas2dResult<Filter> {
    if let Some(operation) = ColorFilterOp::from_name(name) {
        let amount = if args.is_empty() {
            1.0
        } else {
            parse_amount(args)?
        };
        return Ok(Filter::Color { operation, amount });
    }

    match name {
        "blur" => {
            let radius = if args.is_empty() {
                0.0
            } else {
                parse_length(args, font_size_px)?
            };
            if radius < 0.0 {
                return Err(error("negative blur radius"));
            }
            Ok(Filter::Blur { radius })
        }
        "hue-rotate" => {
            let degrees = if args.is_empty() {
                0.0
            } else {
                parse_angle(args)?
            };
            Ok(Filter::HueRotate { degrees })
        }
        "drop-shadow" => parse_drop_shadow(args, font_size_px),
        other => Err(error(&format!("unsupported filter function {other:?}"))),
    }
}

fn parse_drop_shadow(args: &str, font_size_px: f32) -> Canvas2dResult<Filter> {
    let mut lengths = Vec::new();
    let mut color = None;
    // Number of lengths seen before the color.
    let mut color_at = None;
    for token in split_args(args) {
        match parse_length(token, font_size_px) {
            Ok(_) if matches!(color_at, Some(n) if n > 0) => {
                return Err(error("color must not split the shadow lengths"))
            }
            Ok(length) => lengths.push(length),
            Err(_) if color.is_none() => {
                color = Some(parse_color(token)?);
                color_at = Some(lengths.len());
            }
            Err(err) => return Err(err),
        }
    }
    if !(2..=3).contains(&lengths.len()) {
        return Err(error("drop-shadow needs two or three lengths"));
    }
    let radius = lengths.get(2).copied().unwrap_or(0.0);
    if radius < 0.0 {
        return Err(error("negative drop-shadow radius"));
    }
    Ok(Filter::DropShadow {
        offset_x: lengths[0],
        offset_y: lengths[1],
        radius,
        color: color.unwrap_or(Color::BLACK),
    })
}

/// Split a CSS number (optional sign, digits, fraction and exponent) from the
/// unit that follows it.
fn split_number(token: &str) -> Canvas2dResult<(f32, &str)> {
    let bytes = token.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    end = digits_from(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }
    // `e` only starts an exponent when digits follow; otherwise it begins a
    // unit such as `em`.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            end = digits_from(exp);
        }
    }
    let value: f32 = token[..end]
        .parse()
        .map_err(|_| error(&format!("expected a number in {token:?}")))?;
    if !value.is_finite() {
        return Err(error("non-finite number"));
    }
    Ok((value, &token[end..]))
}

fn parse_length(token: &str, font_size_px: f32) -> Canvas2dResult<f32> {
    let (value, unit) = split_number(token)?;
    match unit.to_ascii_lowercase().as_str() {
        "px" => Ok(value),
        "pt" => Ok(value * 4.0 / 3.0),
        "em" => Ok(value * font_size_px),
        "rem" => Ok(value * ROOT_FONT_SIZE_PX),
        "" if value == 0.0 => Ok(0.0),
        other => Err(error(&format!("unsupported length unit {other:?}"))),
    }
}

fn parse_angle(token: &str) -> Canvas2dResult<f32> {
    let (value, unit) = split_number(token)?;
    match unit.to_ascii_lowercase().as_str() {
        "deg" => Ok(value),
        "rad" => Ok(value.to_degrees()),
        "grad" => Ok(value * 0.9),
        "turn" => Ok(value * 360.0),
        "" if value == 0.0 => Ok(0.0),
        other => Err(error(&format!("unsupported angle unit {other:?}"))),
    }
}

fn parse_amount(token: &str) -> Canvas2dResult<f32> {
    let (value, unit) = split_number(token)?;
    let amount = match unit {
        "" => value,
        "%" => value / 100.0,
        other => return Err(error(&format!("unexpected unit {other:?} in amount"))),
    };
    if amount < 0.0 {
        return Err(error("negative filter amount"));
    }
    Ok(amount)
}
