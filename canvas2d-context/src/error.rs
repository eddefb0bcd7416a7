//! Error types for canvas2d-context.

use thiserror::Error;

/// Result type alias using Canvas2dError.
pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

/// Errors that can occur in Canvas 2D operations.
///
/// Inputs that a canvas silently ignores (non-finite geometry, out-of-range
/// alpha, unknown composite operators, unparseable filters) never produce one
/// of these; the call just leaves the state unchanged.
#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// A pixel buffer was requested with a zero width or height.
    #[error("IndexSizeError: {0}")]
    IndexSize(String),

    /// Pixel data was requested from a canvas that is not origin-clean.
    #[error("SecurityError: {0}")]
    Security(String),

    /// An image source is structurally unusable (detached bitmap, zero-sized canvas).
    #[error("InvalidStateError: {0}")]
    InvalidState(String),

    /// An enumerated option had an unrecognized value.
    #[error("TypeError: {0}")]
    Type(String),

    /// Requested surface exceeds the per-axis size limit.
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// Failed to parse a filter value list.
    #[error("Failed to parse filter: {0}")]
    FilterParseError(String),

    /// Invalid SVG path data.
    #[error("Path error: {0}")]
    PathError(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for Canvas2dError {
    fn from(err: png::EncodingError) -> Self {
        Canvas2dError::PngError(err.to_string())
    }
}
