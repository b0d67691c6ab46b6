//! Pixel to complex-plane mapping.
//!
//! Every image samples the same base window `[-2, 2] x [-2, 2]`; output
//! resolution only changes sampling density. The view transform then
//! subtracts the offset, divides by the scale and, optionally, stretches the
//! real axis by the aspect ratio so non-square images are not distorted.

use glam::DVec2;
use serde::Serialize;

/// Half-width of the base sampling window.
const BASE_EXTENT: f64 = 2.0;

/// Offset, scale and aspect handling for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub offset: DVec2,
    pub scale: DVec2,
    pub adjust_for_aspect_ratio: bool,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset: DVec2::ZERO,
            scale: DVec2::ONE,
            adjust_for_aspect_ratio: true,
        }
    }
}

/// Base-window coordinate of pixel `(i, j)`: `(i / width) * 4 - 2`.
pub fn base_coordinate(i: usize, j: usize, width: usize, height: usize) -> DVec2 {
    let extent = 2.0 * BASE_EXTENT;
    DVec2::new(
        (i as f64 / width as f64) * extent - BASE_EXTENT,
        (j as f64 / height as f64) * extent - BASE_EXTENT,
    )
}

impl ViewTransform {
    /// Copy with a different scale.
    pub fn with_scale(self, scale: DVec2) -> Self {
        Self { scale, ..self }
    }

    /// Applies offset, scale and aspect correction to a base coordinate.
    ///
    /// `aspect` is `width / height`; it is only used when
    /// `adjust_for_aspect_ratio` is set.
    #[inline]
    pub fn apply(&self, base: DVec2, aspect: f64) -> DVec2 {
        let mut p = (base - self.offset) / self.scale;
        if self.adjust_for_aspect_ratio {
            p.x *= aspect;
        }
        p
    }

    /// Plane coordinate sampled by pixel `(i, j)` of a `width x height` image.
    pub fn pixel_to_plane(&self, i: usize, j: usize, width: usize, height: usize) -> DVec2 {
        let aspect = width as f64 / height as f64;
        self.apply(base_coordinate(i, j, width, height), aspect)
    }
}
