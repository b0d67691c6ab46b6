//! Immutable render configuration built once from a flat key-value object.
//!
//! [`RenderConfig::from_json`] reads every key with its documented default,
//! parses the enum-valued settings and validates the numeric ones. Any
//! problem is reported before a single pixel is computed. The resulting value
//! is passed by reference to every stage of the pipeline.

use crate::color::{
    ColorConfig, ColorModel, Rgba, DEFAULT_CHANNEL_FALLOFF, DEFAULT_FALLOFF_STRENGTH, DEFAULT_TINT,
};
use crate::error::RenderError;
use crate::escape::{EscapeLimits, DEFAULT_MAX_ITERATIONS, DEFAULT_RADIUS};
use crate::fractal::{Fractal, FractalParams, Julia, DEFAULT_EXPONENT};
use crate::interpolate::Interpolation;
use crate::params::{param_bool, param_f64, param_f64_any, param_string, param_u32, param_usize};
use crate::view::ViewTransform;
use glam::DVec2;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

pub const DEFAULT_WIDTH: usize = 1024;
pub const DEFAULT_HEIGHT: usize = 1024;
pub const DEFAULT_FRACTAL: &str = "Julia";
pub const DEFAULT_FRAME_COUNT: usize = 30;
pub const DEFAULT_INTERPOLATION: &str = "cosine";
pub const DEFAULT_COLOR_MODEL: &str = "tint";
pub const DEFAULT_OUTPUT_PATH: &str = ".";

/// Start and end values for a pair of animated parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range2 {
    pub start: DVec2,
    pub end: DVec2,
}

impl Range2 {
    /// Component-wise interpolation at position `t`.
    pub fn at(&self, t: f64, method: Interpolation) -> DVec2 {
        DVec2::new(
            method.apply(self.start.x, self.end.x, t),
            method.apply(self.start.y, self.end.y, t),
        )
    }
}

/// Multi-frame animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationSpec {
    pub frame_count: usize,
    pub interpolation: Interpolation,
    /// Animated external parameter `c` (real, imaginary).
    pub coordinates: Option<Range2>,
    /// Animated `(scale_x, scale_y)`.
    pub scale: Option<Range2>,
}

/// The complete, validated configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub fractal: FractalParams,
    pub limits: EscapeLimits,
    pub view: ViewTransform,
    pub color: ColorConfig,
    /// `None` renders a single still frame.
    pub animation: Option<AnimationSpec>,
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fractal: FractalParams::Julia(Julia { c: DVec2::ZERO }),
            limits: EscapeLimits::default(),
            view: ViewTransform::default(),
            color: ColorConfig::default(),
            animation: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_PATH),
            file_prefix: DEFAULT_FRACTAL.to_ascii_lowercase(),
        }
    }
}

fn require(ok: bool, name: &str, reason: &str) -> Result<(), RenderError> {
    if ok {
        Ok(())
    } else {
        Err(RenderError::invalid(name, reason))
    }
}

fn unit_interval(value: f64, name: &str) -> Result<f64, RenderError> {
    require((0.0..=1.0).contains(&value), name, "must be within [0, 1]")?;
    Ok(value)
}

fn non_zero_scale(value: f64, name: &str) -> Result<f64, RenderError> {
    require(value.is_finite() && value != 0.0, name, "must be finite and non-zero")?;
    Ok(value)
}

fn positive(value: f64, name: &str) -> Result<f64, RenderError> {
    require(value.is_finite() && value > 0.0, name, "must be finite and positive")?;
    Ok(value)
}

fn finite(value: f64, name: &str) -> Result<f64, RenderError> {
    require(value.is_finite(), name, "must be finite")?;
    Ok(value)
}

impl RenderConfig {
    /// Builds and validates a configuration from a flat JSON object.
    ///
    /// Missing keys take their defaults. Returns a configuration error for a
    /// non-object input, a wrongly typed key, an unknown enum name or an out
    /// of range number.
    pub fn from_json(params: &Value) -> Result<Self, RenderError> {
        if !params.is_object() {
            return Err(RenderError::ParamTypeMismatch {
                name: "<config>".into(),
                expected: "object".into(),
                got: match params {
                    Value::Array(_) => "array",
                    Value::String(_) => "string",
                    Value::Number(_) => "number",
                    Value::Bool(_) => "bool",
                    _ => "null",
                }
                .into(),
            });
        }

        let width = param_usize(params, "Width", DEFAULT_WIDTH)?;
        let height = param_usize(params, "Height", DEFAULT_HEIGHT)?;
        let area = width.checked_mul(height).and_then(|n| n.checked_mul(4));
        let encodable = u32::try_from(width).is_ok() && u32::try_from(height).is_ok();
        if width == 0 || height == 0 || area.is_none() || !encodable {
            return Err(RenderError::InvalidDimensions { width, height });
        }

        let c = DVec2::new(
            finite(param_f64(params, "Real", 0.0)?, "Real")?,
            finite(param_f64(params, "Imaginary", 0.0)?, "Imaginary")?,
        );
        let exponent = finite(
            param_f64(params, "MultiJuliaExponent", DEFAULT_EXPONENT)?,
            "MultiJuliaExponent",
        )?;
        let fractal_name = param_string(params, "FractalType", DEFAULT_FRACTAL)?;
        let fractal = FractalParams::from_name(&fractal_name, c, exponent)?;

        let max_iterations = param_u32(params, "MaxIterations", DEFAULT_MAX_ITERATIONS)?;
        require(max_iterations > 0, "MaxIterations", "must be at least 1")?;
        let radius = param_f64_any(params, &["EscapeRadius", "Radius"], DEFAULT_RADIUS)?;
        require(
            radius.is_finite() && radius > 1.0,
            "EscapeRadius",
            "must be finite and greater than 1",
        )?;
        let limits = EscapeLimits {
            radius,
            max_iterations,
        };

        let base_scale = DVec2::new(
            non_zero_scale(param_f64(params, "ScaleX", 1.0)?, "ScaleX")?,
            non_zero_scale(param_f64(params, "ScaleY", 1.0)?, "ScaleY")?,
        );
        let view = ViewTransform {
            offset: DVec2::new(
                finite(param_f64(params, "OffsetX", 0.0)?, "OffsetX")?,
                finite(param_f64(params, "OffsetY", 0.0)?, "OffsetY")?,
            ),
            scale: base_scale,
            adjust_for_aspect_ratio: param_bool(params, "AdjustForAspectRatio", true)?,
        };

        let color = color_from_json(params)?;
        let animation = animation_from_json(params, &fractal, c, base_scale)?;

        let output_dir = PathBuf::from(param_string(params, "OutputPath", DEFAULT_OUTPUT_PATH)?);
        let file_prefix = param_string(
            params,
            "FilePrefix",
            &fractal.name().to_ascii_lowercase(),
        )?;
        require(
            !file_prefix.is_empty() && !file_prefix.contains(['/', '\\']),
            "FilePrefix",
            "must be a non-empty file name without separators",
        )?;

        Ok(Self {
            width,
            height,
            fractal,
            limits,
            view,
            color,
            animation,
            output_dir,
            file_prefix,
        })
    }

    /// `width / height`.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Number of frames this configuration produces.
    pub fn frame_count(&self) -> usize {
        self.animation.map_or(1, |a| a.frame_count)
    }
}

fn color_from_json(params: &Value) -> Result<ColorConfig, RenderError> {
    let model_name = param_string(params, "ColorModel", DEFAULT_COLOR_MODEL)?;
    let model = match ColorModel::check_name(&model_name)? {
        "per-channel" => {
            let channel = |name: &str, default: f64| -> Result<f64, RenderError> {
                positive(param_f64(params, name, default)?, name)
            };
            ColorModel::PerChannel {
                falloff: [
                    channel("RedFalloff", DEFAULT_CHANNEL_FALLOFF[0])?,
                    channel("GreenFalloff", DEFAULT_CHANNEL_FALLOFF[1])?,
                    channel("BlueFalloff", DEFAULT_CHANNEL_FALLOFF[2])?,
                ],
            }
        }
        _ => {
            let strength = param_f64_any(
                params,
                &["FalloffStrength", "RFalloff"],
                DEFAULT_FALLOFF_STRENGTH,
            )?;
            let tint = |name: &str, default: f64| -> Result<f64, RenderError> {
                unit_interval(param_f64(params, name, default)?, name)
            };
            ColorModel::Tint {
                strength: positive(strength, "FalloffStrength")?,
                tint: [
                    tint("FalloffR", DEFAULT_TINT[0])?,
                    tint("FalloffG", DEFAULT_TINT[1])?,
                    tint("FalloffB", DEFAULT_TINT[2])?,
                ],
            }
        }
    };

    let bg = |name: &str, default: f64| -> Result<f64, RenderError> {
        unit_interval(param_f64(params, name, default)?, name)
    };
    let background = Rgba::new(
        bg("BackgroundR", 0.0)?,
        bg("BackgroundG", 0.0)?,
        bg("BackgroundB", 0.0)?,
        bg("BackgroundA", 1.0)?,
    );

    let non_escaping_value = param_f64(params, "NonEscapingValue", 0.0)?;
    require(
        non_escaping_value.is_finite() && non_escaping_value >= 0.0,
        "NonEscapingValue",
        "must be finite and non-negative",
    )?;

    Ok(ColorConfig {
        model,
        background,
        non_escaping_value,
    })
}

fn animation_from_json(
    params: &Value,
    fractal: &FractalParams,
    base_c: DVec2,
    base_scale: DVec2,
) -> Result<Option<AnimationSpec>, RenderError> {
    if !param_bool(params, "Animate", false)? {
        return Ok(None);
    }

    let frame_count = param_usize(params, "FrameCount", DEFAULT_FRAME_COUNT)?;
    require(frame_count >= 1, "FrameCount", "must be at least 1 when animating")?;
    let interpolation = Interpolation::from_name(&param_string(
        params,
        "InterpolationType",
        DEFAULT_INTERPOLATION,
    )?)?;

    let coordinates = if param_bool(params, "AnimateCoordinates", false)? {
        if fractal.c().is_none() {
            tracing::warn!(
                fractal = fractal.name(),
                "AnimateCoordinates has no effect on a fractal without an external parameter"
            );
        }
        let get = |name: &str, default: f64| -> Result<f64, RenderError> {
            finite(param_f64(params, name, default)?, name)
        };
        Some(Range2 {
            start: DVec2::new(get("RealStart", base_c.x)?, get("ImaginaryStart", base_c.y)?),
            end: DVec2::new(get("RealEnd", base_c.x)?, get("ImaginaryEnd", base_c.y)?),
        })
    } else {
        None
    };

    let scale = if param_bool(params, "AnimateScale", false)? {
        let get = |name: &str, default: f64| -> Result<f64, RenderError> {
            non_zero_scale(param_f64(params, name, default)?, name)
        };
        Some(Range2 {
            start: DVec2::new(get("ScaleXStart", base_scale.x)?, get("ScaleYStart", base_scale.y)?),
            end: DVec2::new(get("ScaleXEnd", base_scale.x)?, get("ScaleYEnd", base_scale.y)?),
        })
    } else {
        None
    };

    Ok(Some(AnimationSpec {
        frame_count,
        interpolation,
        coordinates,
        scale,
    }))
}

/// Schema describing every configuration key, its type, default and meaning.
pub fn schema() -> Value {
    json!({
        "Width": { "type": "integer", "default": DEFAULT_WIDTH, "min": 1, "description": "Image width in pixels" },
        "Height": { "type": "integer", "default": DEFAULT_HEIGHT, "min": 1, "description": "Image height in pixels" },
        "FractalType": { "type": "string", "default": DEFAULT_FRACTAL, "values": FractalParams::list_names(), "description": "Fractal to render" },
        "Real": { "type": "number", "default": 0.0, "description": "Real part of the external parameter c" },
        "Imaginary": { "type": "number", "default": 0.0, "description": "Imaginary part of the external parameter c" },
        "MultiJuliaExponent": { "type": "number", "default": DEFAULT_EXPONENT, "description": "Exponent n for Multibrot and MultiJulia" },
        "MaxIterations": { "type": "integer", "default": DEFAULT_MAX_ITERATIONS, "min": 1, "description": "Iteration budget per point" },
        "EscapeRadius": { "type": "number", "default": DEFAULT_RADIUS, "min": 1.0, "exclusive_min": true, "aliases": ["Radius"], "description": "Escape threshold on |z|^2" },
        "NonEscapingValue": { "type": "number", "default": 0.0, "min": 0.0, "description": "Value for bounded points as a fraction of MaxIterations (0 darkest, 1 brightest)" },
        "ColorModel": { "type": "string", "default": DEFAULT_COLOR_MODEL, "values": ColorModel::list_names(), "description": "Falloff model" },
        "FalloffStrength": { "type": "number", "default": DEFAULT_FALLOFF_STRENGTH, "aliases": ["RFalloff"], "description": "Tint model falloff; higher is darker" },
        "FalloffR": { "type": "number", "default": DEFAULT_TINT[0], "min": 0.0, "max": 1.0, "description": "Tint red" },
        "FalloffG": { "type": "number", "default": DEFAULT_TINT[1], "min": 0.0, "max": 1.0, "description": "Tint green" },
        "FalloffB": { "type": "number", "default": DEFAULT_TINT[2], "min": 0.0, "max": 1.0, "description": "Tint blue" },
        "RedFalloff": { "type": "number", "default": DEFAULT_CHANNEL_FALLOFF[0], "description": "Per-channel model red falloff distance; lower is brighter" },
        "GreenFalloff": { "type": "number", "default": DEFAULT_CHANNEL_FALLOFF[1], "description": "Per-channel model green falloff distance" },
        "BlueFalloff": { "type": "number", "default": DEFAULT_CHANNEL_FALLOFF[2], "description": "Per-channel model blue falloff distance" },
        "BackgroundR": { "type": "number", "default": 0.0, "min": 0.0, "max": 1.0, "description": "Background red" },
        "BackgroundG": { "type": "number", "default": 0.0, "min": 0.0, "max": 1.0, "description": "Background green" },
        "BackgroundB": { "type": "number", "default": 0.0, "min": 0.0, "max": 1.0, "description": "Background blue" },
        "BackgroundA": { "type": "number", "default": 1.0, "min": 0.0, "max": 1.0, "description": "Background alpha" },
        "AdjustForAspectRatio": { "type": "boolean", "default": true, "description": "Stretch the real axis by width/height" },
        "OffsetX": { "type": "number", "default": 0.0, "description": "Subtracted from the real coordinate before scaling" },
        "OffsetY": { "type": "number", "default": 0.0, "description": "Subtracted from the imaginary coordinate before scaling" },
        "ScaleX": { "type": "number", "default": 1.0, "description": "Real-axis zoom (non-zero)" },
        "ScaleY": { "type": "number", "default": 1.0, "description": "Imaginary-axis zoom (non-zero)" },
        "Animate": { "type": "boolean", "default": false, "description": "Render a frame sequence" },
        "FrameCount": { "type": "integer", "default": DEFAULT_FRAME_COUNT, "min": 1, "description": "Frames in the sequence" },
        "InterpolationType": { "type": "string", "default": DEFAULT_INTERPOLATION, "values": Interpolation::list_names(), "description": "Blend curve between start and end values" },
        "AnimateCoordinates": { "type": "boolean", "default": false, "description": "Interpolate the external parameter c" },
        "RealStart": { "type": "number", "default": "Real", "description": "Real part of c on the first frame" },
        "RealEnd": { "type": "number", "default": "Real", "description": "Real part of c on the last frame" },
        "ImaginaryStart": { "type": "number", "default": "Imaginary", "description": "Imaginary part of c on the first frame" },
        "ImaginaryEnd": { "type": "number", "default": "Imaginary", "description": "Imaginary part of c on the last frame" },
        "AnimateScale": { "type": "boolean", "default": false, "description": "Interpolate ScaleX and ScaleY" },
        "ScaleXStart": { "type": "number", "default": "ScaleX", "description": "ScaleX on the first frame" },
        "ScaleXEnd": { "type": "number", "default": "ScaleX", "description": "ScaleX on the last frame" },
        "ScaleYStart": { "type": "number", "default": "ScaleY", "description": "ScaleY on the first frame" },
        "ScaleYEnd": { "type": "number", "default": "ScaleY", "description": "ScaleY on the last frame" },
        "OutputPath": { "type": "string", "default": DEFAULT_OUTPUT_PATH, "description": "Directory for written images" },
        "FilePrefix": { "type": "string", "default": "lowercased FractalType", "description": "File name prefix" },
    })
}
