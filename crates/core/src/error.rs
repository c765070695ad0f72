//! Error types for the particle backdrop.

use thiserror::Error;

/// Errors produced by backdrop operations.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Width or height was zero (or not finite) when a pixel buffer was required.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A theme name was not recognized.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A configuration value was present but unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// No drawing surface could be acquired from the host.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A file could not be read or written.
    #[error("I/O error: {0}")]
    Io(String),
}
