//! Paint error types

use thiserror::Error;

/// Errors raised while building paint resources
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    /// Color string could not be parsed
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// SVG path data could not be parsed
    #[error("invalid path data: {0}")]
    InvalidPathData(String),

    /// Path has no drawable segments
    #[error("path is empty")]
    EmptyPath,

    /// Surface dimensions are zero or too large
    #[error("invalid surface size {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },

    /// Raster output could not be encoded
    #[error("encoding failed: {0}")]
    Encode(String),
}

/// Result type for paint operations
pub type Result<T> = std::result::Result<T, PaintError>;
