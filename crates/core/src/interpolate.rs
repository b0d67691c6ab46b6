//! Scalar interpolation between two endpoint values.

use crate::error::RenderError;
use serde::Serialize;
use std::f64::consts::PI;

/// All recognized `InterpolationType` names.
const INTERPOLATION_NAMES: &[&str] = &["linear", "cosine"];

/// Blending curve used by the animation driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Constant rate: `t`.
    #[default]
    Linear,
    /// Ease-in-out: `(1 - cos(t * pi)) / 2`.
    Cosine,
}

impl Interpolation {
    /// Parses an interpolation name, case-insensitively.
    ///
    /// An empty name selects [`Interpolation::Linear`]. Any other unknown
    /// name is `RenderError::UnknownInterpolation`.
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" => {
                tracing::debug!("empty interpolation type, using linear");
                Ok(Interpolation::Linear)
            }
            "linear" => Ok(Interpolation::Linear),
            "cosine" => Ok(Interpolation::Cosine),
            _ => Err(RenderError::UnknownInterpolation(name.to_string())),
        }
    }

    /// Returns a slice of all recognized interpolation names.
    pub fn list_names() -> &'static [&'static str] {
        INTERPOLATION_NAMES
    }

    /// Maps a position in [0, 1] to a blend weight in [0, 1].
    pub fn weight(self, t: f64) -> f64 {
        match self {
            Interpolation::Linear => t,
            Interpolation::Cosine => (1.0 - (t * PI).cos()) / 2.0,
        }
    }

    /// Blends `start` toward `end` at position `t`.
    pub fn apply(self, start: f64, end: f64, t: f64) -> f64 {
        lerp(start, end, self.weight(t))
    }
}

/// Convenience form of [`Interpolation::apply`].
pub fn interpolate(start: f64, end: f64, t: f64, method: Interpolation) -> f64 {
    method.apply(start, end, t)
}

/// Weighted blend that returns `start` exactly at `w = 0` and `end` exactly
/// at `w = 1`.
pub fn lerp(start: f64, end: f64, w: f64) -> f64 {
    start * (1.0 - w) + end * w
}
