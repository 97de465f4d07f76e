//! Error types for the arctext crate.

use thiserror::Error;

/// Result type alias using ArcTextError.
pub type ArcTextResult<T> = Result<T, ArcTextError>;

/// Errors that can occur while building or exporting curved text.
#[derive(Debug, Error)]
pub enum ArcTextError {
    /// Invalid surface dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse CSS font declaration.
    #[error("Failed to parse font declaration: {0}")]
    FontParseError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for ArcTextError {
    fn from(err: png::EncodingError) -> Self {
        ArcTextError::PngError(err.to_string())
    }
}
