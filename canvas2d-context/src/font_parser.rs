//! CSS font shorthand parsing.
//!
//! Accepts `[style] [variant] [weight] size[/line-height] family[, family]*`,
//! e.g. `"bold italic 14px 'Times New Roman', serif"`.

use crate::error::{Canvas2dError, Canvas2dResult};
use cosmic_text::{Style, Weight};

/// Root font size used to resolve `em`, `rem` and percentage sizes.
pub(crate) const ROOT_FONT_SIZE_PX: f32 = 16.0;

/// A parsed font shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFont {
    pub style: Style,
    pub weight: Weight,
    /// Font size in CSS pixels.
    pub size_px: f32,
    /// Family names in preference order. Generic names are kept as written.
    pub families: Vec<String>,
}

impl Default for ParsedFont {
    fn default() -> Self {
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

impl ParsedFont {
    /// Serialize back to a shorthand string.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::new();
        match self.style {
            Style::Italic => parts.push("italic".to_string()),
            Style::Oblique => parts.push("oblique".to_string()),
            Style::Normal => {}
        }
        if self.weight != Weight::NORMAL {
            parts.push(if self.weight == Weight::BOLD {
                "bold".to_string()
            } else {
                self.weight.0.to_string()
            });
        }
        parts.push(format!("{}px", self.size_px));
        let families: Vec<String> = self
            .families
            .iter()
            .map(|family| {
                if family.contains(char::is_whitespace) {
                    format!("\"{family}\"")
                } else {
                    family.clone()
                }
            })
            .collect();
        parts.push(families.join(", "));
        parts.join(" ")
    }
}

/// Parse a CSS font shorthand.
pub fn parse_font(input: &str) -> Canvas2dResult<ParsedFont> {
    let mut font = ParsedFont::default();
    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(Canvas2dError::FontParseError("empty font string".to_string()));
    }

    // Style, variant and weight keywords may come in any order before the size.
    loop {
        let (word, after) = split_word(rest);
        match word {
            "normal" | "small-caps" => {}
            "italic" => font.style = Style::Italic,
            "oblique" => font.style = Style::Oblique,
            "bold" | "bolder" => font.weight = Weight::BOLD,
            "lighter" => font.weight = Weight::LIGHT,
            other => match other.parse::<u16>() {
                Ok(weight) if (1..=1000).contains(&weight) && !after.is_empty() => {
                    font.weight = Weight(weight)
                }
                _ => break,
            },
        }
        rest = after;
    }

    let (size_token, after) = split_word(rest);
    let size_token = size_token.split('/').next().unwrap_or_default();
    font.size_px = parse_size(size_token)?;
    rest = after;

    // A line height may be attached with or without surrounding spaces.
    if let Some(after_slash) = rest.strip_prefix('/') {
        rest = split_word(after_slash).1;
    }

    let families = parse_families(rest);
    if families.is_empty() {
        return Err(Canvas2dError::FontParseError(format!(
            "missing font family in {input:?}"
        )));
    }
    font.families = families;
    Ok(font)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start()),
        None => (s, ""),
    }
}

fn parse_size(token: &str) -> Canvas2dResult<f32> {
    let unit_start = token
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(token.len());
    let (number, unit) = token.split_at(unit_start);
    let value: f32 = number
        .parse()
        .map_err(|_| Canvas2dError::FontParseError(format!("invalid font size {token:?}")))?;
    let px = match unit {
        "px" => value,
        "pt" => value * 4.0 / 3.0,
        "pc" => value * 16.0,
        "in" => value * 96.0,
        "em" | "rem" => value * ROOT_FONT_SIZE_PX,
        "%" => value * ROOT_FONT_SIZE_PX / 100.0,
        other => {
            return Err(Canvas2dError::FontParseError(format!(
                "unsupported font size unit {other:?}"
            )))
        }
    };
    Ok(px)
}

fn parse_families(s: &str) -> Vec<String> {
    s.split(',')
        .map(|family| {
            family
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        })
        .filter(|family| !family.is_empty())
        .collect()
}
