//! Construction-time settings for a 2D context.

use crate::error::{Canvas2dError, Canvas2dResult};
use std::fmt;
use std::str::FromStr;

/// Color space of a context or pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredefinedColorSpace {
    /// sRGB.
    #[default]
    Srgb,
    /// Display P3.
    DisplayP3,
}

impl PredefinedColorSpace {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedColorSpace::Srgb => "srgb",
            PredefinedColorSpace::DisplayP3 => "display-p3",
        }
    }
}

impl FromStr for PredefinedColorSpace {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "srgb" => Ok(PredefinedColorSpace::Srgb),
            "display-p3" => Ok(PredefinedColorSpace::DisplayP3),
            other => Err(Canvas2dError::Type(format!(
                "'{other}' is not a valid value for enumeration colorSpace"
            ))),
        }
    }
}

impl fmt::Display for PredefinedColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage representation of the backing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasColorType {
    /// 8 bits per channel, unsigned normalized.
    #[default]
    Unorm8,
    /// 16 bits per channel, half float.
    Float16,
}

impl CanvasColorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanvasColorType::Unorm8 => "unorm8",
            CanvasColorType::Float16 => "float16",
        }
    }
}

impl FromStr for CanvasColorType {
    type Err = Canvas2dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unorm8" => Ok(CanvasColorType::Unorm8),
            "float16" => Ok(CanvasColorType::Float16),
            other => Err(Canvas2dError::Type(format!(
                "'{other}' is not a valid value for enumeration colorType"
            ))),
        }
    }
}

/// Raw settings as supplied by a caller, before validation.
///
/// `None` means the member was not supplied and takes its default.
#[derive(Debug, Clone, Default)]
pub struct CanvasSettingsInit {
    pub alpha: Option<bool>,
    pub desynchronized: Option<bool>,
    pub color_space: Option<String>,
    pub color_type: Option<String>,
    pub will_read_frequently: Option<bool>,
}

/// Validated, immutable settings of a 2D context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasRenderingContext2DSettings {
    /// Whether the surface has an alpha channel. Opaque surfaces start black.
    pub alpha: bool,
    /// Low-latency hint. Recorded only.
    pub desynchronized: bool,
    /// Color space of the surface.
    pub color_space: PredefinedColorSpace,
    /// Storage representation of the surface. Recorded only.
    pub color_type: CanvasColorType,
    /// Read-back hint. Recorded only.
    pub will_read_frequently: bool,
}

impl Default for CanvasRenderingContext2DSettings {
    fn default() -> Self {
        Self {
            alpha: true,
            desynchronized: false,
            color_space: PredefinedColorSpace::Srgb,
            color_type: CanvasColorType::Unorm8,
            will_read_frequently: false,
        }
    }
}

impl TryFrom<&CanvasSettingsInit> for CanvasRenderingContext2DSettings {
    type Error = Canvas2dError;

    fn try_from(init: &CanvasSettingsInit) -> Canvas2dResult<Self> {
        let defaults = Self::default();
        let color_space = match &init.color_space {
            Some(s) => s.parse()?,
            None => defaults.color_space,
        };
        let color_type = match &init.color_type {
            Some(s) => s.parse()?,
            None => defaults.color_type,
        };
        Ok(Self {
            alpha: init.alpha.unwrap_or(defaults.alpha),
            desynchronized: init.desynchronized.unwrap_or(defaults.desynchronized),
            color_space,
            color_type,
            will_read_frequently: init
                .will_read_frequently
                .unwrap_or(defaults.will_read_frequently),
        })
    }
}
