//! Error types for the fractal renderer core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building a render configuration or writing frames.
///
/// The evaluators, the interpolator and the color mapper never fail; every
/// variant here is raised either once at startup (configuration) or at the
/// boundary with the image writer (output).
#[derive(Debug, Error)]
pub enum RenderError {
    /// Width or height was zero, exceeded `u32::MAX`, or their product overflowed.
    #[error("invalid dimensions {width}x{height}: width and height must be between 1 and 4294967295")]
    InvalidDimensions { width: usize, height: usize },

    /// A configuration key existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A numeric configuration value was outside its valid domain.
    #[error("invalid value for '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// `FractalType` did not name a known fractal.
    #[error("unknown fractal type: {0}")]
    UnknownFractal(String),

    /// `InterpolationType` did not name a known interpolation method.
    #[error("unknown interpolation type: {0}")]
    UnknownInterpolation(String),

    /// `ColorModel` did not name a known color model.
    #[error("unknown color model: {0}")]
    UnknownColorModel(String),

    /// A raster could not be encoded into an image container.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// An encoded frame could not be written to disk.
    #[error("failed to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl RenderError {
    /// Shorthand for [`RenderError::InvalidParam`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        RenderError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    /// True for errors detected while validating configuration, before any
    /// frame is rendered.
    pub fn is_config(&self) -> bool {
        !matches!(self, RenderError::Encode(_) | RenderError::Write { .. })
    }
}
