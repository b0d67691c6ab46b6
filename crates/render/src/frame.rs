//! Single-frame rendering: pixel -> plane -> escape -> color.
//!
//! The fractal variant is matched once per frame; each arm runs the same
//! generic row loop monomorphized for its evaluator, so the per-pixel path
//! has no branch on fractal kind. Rows are shaded in parallel with rayon,
//! each worker owning one disjoint row slice of the raster.

use fractal_core::{
    ColorConfig, ColorMapper, EscapeLimits, Fractal, FractalParams, RenderError, ViewTransform,
};
use rayon::prelude::*;

use crate::pixel::{Raster, CHANNELS};

/// Renders one complete `width x height` frame.
///
/// Returns `RenderError::InvalidDimensions` if the raster cannot be
/// allocated; there is no per-pixel failure.
pub fn render_frame(
    width: usize,
    height: usize,
    view: &ViewTransform,
    fractal: &FractalParams,
    limits: &EscapeLimits,
    color: &ColorConfig,
) -> Result<Raster, RenderError> {
    let mut raster = Raster::new(width, height)?;
    let mapper = ColorMapper::new(color, limits.max_iterations);
    match fractal {
        FractalParams::Julia(f) => shade(&mut raster, f, view, limits, &mapper),
        FractalParams::Mandelbrot(f) => shade(&mut raster, f, view, limits, &mapper),
        FractalParams::Multibrot(f) => shade(&mut raster, f, view, limits, &mapper),
        FractalParams::MultiJulia(f) => shade(&mut raster, f, view, limits, &mapper),
    }
    Ok(raster)
}

/// Fills every pixel of `raster` using evaluator `fractal`.
fn shade<F: Fractal>(
    raster: &mut Raster,
    fractal: &F,
    view: &ViewTransform,
    limits: &EscapeLimits,
    mapper: &ColorMapper,
) {
    let width = raster.width();
    let height = raster.height();
    raster
        .data_mut()
        .par_chunks_exact_mut(width * CHANNELS)
        .enumerate()
        .for_each(|(j, row)| {
            for (i, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let z = view.pixel_to_plane(i, j, width, height);
                px.copy_from_slice(&mapper.map(fractal.escape(z, limits)));
            }
        });
}
