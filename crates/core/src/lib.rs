#![deny(unsafe_code)]
#![recursion_limit = "256"]
//! Core types for the escape-time fractal renderer.
//!
//! Provides the `Fractal` trait and its evaluators (`Julia`, `Mandelbrot`,
//! `Multibrot`, `MultiJulia`), the shared escape loop and smoothing, the
//! `Interpolation` curves used for animation, the `ColorMapper`, the
//! pixel-to-plane `ViewTransform`, and the validated `RenderConfig`.

pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod fractal;
pub mod interpolate;
pub mod params;
pub mod view;

pub use color::{ColorConfig, ColorMapper, ColorModel, Rgba};
pub use config::{AnimationSpec, Range2, RenderConfig};
pub use error::RenderError;
pub use escape::{Escape, EscapeLimits};
pub use fractal::{Fractal, FractalParams, Julia, Mandelbrot, MultiJulia, Multibrot};
pub use interpolate::{interpolate, Interpolation};
pub use view::ViewTransform;
