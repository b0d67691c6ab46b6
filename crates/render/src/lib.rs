#![deny(unsafe_code)]
//! Frame rendering and animation for the fractal renderer.
//!
//! [`render_frame`] turns a view, a fractal and a color configuration into an
//! RGBA8 [`Raster`]. [`AnimationDriver`] sequences frames from a
//! [`RenderConfig`](fractal_core::RenderConfig), interpolating animated
//! parameters per frame. With the `png` feature, [`snapshot`] writes frames
//! to disk.

pub mod animation;
pub mod frame;
pub mod pixel;
#[cfg(feature = "png")]
pub mod snapshot;

pub use animation::{AnimationDriver, FramePlan};
pub use frame::render_frame;
pub use pixel::Raster;
