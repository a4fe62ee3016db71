//! Stroke error types

use brushstroke_animation::EasingError;
use brushstroke_paint::PaintError;
use thiserror::Error;

/// Errors surfaced by stroke tasks and their configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrokeError {
    /// Malformed control points, path data or option values
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The image/markup rasterizer rejected the request
    #[error("source resolution failed: {0}")]
    SourceResolution(String),

    /// Option combination with no defined behavior
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Options could not be decoded from TOML
    #[error("config error: {0}")]
    Config(String),

    /// The task was dropped before it completed
    #[error("stroke task abandoned before completion")]
    Abandoned,
}

impl From<PaintError> for StrokeError {
    fn from(err: PaintError) -> Self {
        StrokeError::InvalidInput(err.to_string())
    }
}

impl From<EasingError> for StrokeError {
    fn from(err: EasingError) -> Self {
        StrokeError::InvalidInput(err.to_string())
    }
}

impl From<toml::de::Error> for StrokeError {
    fn from(err: toml::de::Error) -> Self {
        StrokeError::Config(err.to_string())
    }
}

/// Result type for stroke operations
pub type Result<T> = std::result::Result<T, StrokeError>;
