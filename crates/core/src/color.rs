//! Escape value to RGBA mapping.
//!
//! An escaped value `v` is turned into a brightness with the saturating
//! falloff curve `v / (v + strength)`, then used to blend from the
//! background color toward the tint. Two models are supported:
//!
//! - [`ColorModel::Tint`]: one falloff strength, RGB tint (the default).
//! - [`ColorModel::PerChannel`]: an independent falloff distance per channel,
//!   each channel blending toward full intensity.
//!
//! Alpha always blends from the background alpha toward fully opaque.

use crate::error::RenderError;
use crate::escape::Escape;
use crate::interpolate::lerp;
use serde::Serialize;

/// All recognized `ColorModel` names.
const COLOR_MODEL_NAMES: &[&str] = &["tint", "per-channel"];

/// Default falloff strength for the tint model.
pub const DEFAULT_FALLOFF_STRENGTH: f64 = 15.0;
/// Default tint (a cold blue).
pub const DEFAULT_TINT: [f64; 3] = [0.03, 0.2, 1.0];
/// Default falloff distances for the per-channel model.
pub const DEFAULT_CHANNEL_FALLOFF: [f64; 3] = [15.0, 100.0, 500.0];

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Quantizes to 8 bits per channel with rounding.
    pub fn to_bytes(self) -> [u8; 4] {
        [
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b),
            channel_byte(self.a),
        ]
    }
}

/// How brightness is derived from an escape value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum ColorModel {
    /// Single falloff strength; RGB blends from background to `tint`.
    Tint { strength: f64, tint: [f64; 3] },
    /// Independent falloff distance per RGB channel; lower is brighter.
    PerChannel { falloff: [f64; 3] },
}

impl Default for ColorModel {
    fn default() -> Self {
        ColorModel::Tint {
            strength: DEFAULT_FALLOFF_STRENGTH,
            tint: DEFAULT_TINT,
        }
    }
}

impl ColorModel {
    /// Returns a slice of all recognized color model names.
    pub fn list_names() -> &'static [&'static str] {
        COLOR_MODEL_NAMES
    }

    /// Validates that the name is a known model. The parameters for the
    /// model are read separately by the config loader.
    pub fn check_name(name: &str) -> Result<&'static str, RenderError> {
        let lower = name.to_ascii_lowercase();
        COLOR_MODEL_NAMES
            .iter()
            .copied()
            .find(|n| *n == lower || (*n == "per-channel" && lower == "perchannel"))
            .ok_or_else(|| RenderError::UnknownColorModel(name.to_string()))
    }
}

/// Everything the color mapper needs besides the iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorConfig {
    pub model: ColorModel,
    pub background: Rgba,
    /// Value assigned to bounded points, as a fraction of `max_iterations`.
    /// 0 is darkest, 1 is brightest.
    pub non_escaping_value: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            model: ColorModel::default(),
            background: Rgba::BLACK,
            non_escaping_value: 0.0,
        }
    }
}

/// Saturating brightness curve: 0 at `value = 0`, approaching 1 as
/// `value` grows. `strength` must be positive.
pub fn falloff(value: f64, strength: f64) -> f64 {
    value / (value + strength)
}

/// Blend that never leaves `[min(a, b), max(a, b)]`.
fn blend(a: f64, b: f64, p: f64) -> f64 {
    lerp(a, b, p).clamp(a.min(b), a.max(b))
}

fn channel_byte(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Maps escape results to RGBA bytes for one frame.
///
/// The bounded-point color depends only on the configuration, so it is
/// computed once at construction.
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper {
    config: ColorConfig,
    bounded: [u8; 4],
}

impl ColorMapper {
    pub fn new(config: &ColorConfig, max_iterations: u32) -> Self {
        let bounded_value = config.non_escaping_value * f64::from(max_iterations);
        let bounded = Self::shade(config, bounded_value);
        Self {
            config: *config,
            bounded,
        }
    }

    /// Color for an escape result.
    #[inline]
    pub fn map(&self, escape: Escape) -> [u8; 4] {
        match escape {
            Escape::Escaped(v) => Self::shade(&self.config, v),
            Escape::Bounded => self.bounded,
        }
    }

    /// Color for a non-negative escape value.
    pub fn shade(config: &ColorConfig, value: f64) -> [u8; 4] {
        let bg = config.background;
        let color = match config.model {
            ColorModel::Tint { strength, tint } => {
                let p = falloff(value, strength);
                Rgba::new(
                    blend(bg.r, tint[0], p),
                    blend(bg.g, tint[1], p),
                    blend(bg.b, tint[2], p),
                    blend(bg.a, 1.0, p),
                )
            }
            ColorModel::PerChannel { falloff: f } => {
                let pr = falloff(value, f[0]);
                Rgba::new(
                    blend(bg.r, 1.0, pr),
                    blend(bg.g, 1.0, falloff(value, f[1])),
                    blend(bg.b, 1.0, falloff(value, f[2])),
                    blend(bg.a, 1.0, pr),
                )
            }
        };
        color.to_bytes()
    }
}
