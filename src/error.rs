//! Error types for the screenshot engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the screenshot engine
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to render or paint a preview tree
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the raster buffer as PNG
    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    /// Failed somewhere in the export pipeline
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Invalid caller-provided input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
