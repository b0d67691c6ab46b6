//! Escape-time iteration and the continuous (smoothed) iteration count.
//!
//! Every fractal in the family shares one protocol: the counter `k` counts
//! escape tests. For `k = 1..=max_iterations` the point escapes when
//! `|z|^2 >= radius`; otherwise the map is applied once more. A point that is
//! already outside the radius therefore escapes at `k = 1` with its initial
//! magnitude, and a bounded point receives exactly `max_iterations` map
//! applications before it is reported as [`Escape::Bounded`].

use glam::DVec2;
use serde::Serialize;
use std::f64::consts::LN_2;

/// Default squared escape radius.
pub const DEFAULT_RADIUS: f64 = 4.0;
/// Default iteration budget per point.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Outcome of iterating a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Escape {
    /// The orbit left the escape radius; carries the smoothed count (>= 0).
    Escaped(f64),
    /// The orbit stayed inside the radius for the whole iteration budget.
    Bounded,
}

impl Escape {
    /// The smoothed value, or `None` for a bounded orbit.
    pub fn value(self) -> Option<f64> {
        match self {
            Escape::Escaped(v) => Some(v),
            Escape::Bounded => None,
        }
    }

    pub fn is_bounded(self) -> bool {
        matches!(self, Escape::Bounded)
    }

    /// Historical encoding where a bounded orbit is `-1.0`.
    pub fn to_legacy(self) -> f64 {
        self.value().unwrap_or(-1.0)
    }
}

/// Loop termination settings shared by every evaluator.
///
/// `radius` is compared against the squared magnitude and must be greater
/// than 1 so that the smoothing formula stays real.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EscapeLimits {
    pub radius: f64,
    pub max_iterations: u32,
}

impl Default for EscapeLimits {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Continuous iteration count: `k + 1 - ln(ln |z|^2) / ln 2`, clamped to 0.
pub fn smooth(k: u32, magnitude_sq: f64) -> f64 {
    let value = f64::from(k) + 1.0 - magnitude_sq.ln().ln() / LN_2;
    value.max(0.0)
}

/// Runs the escape-time loop for `z0` under the map `step`.
///
/// A NaN magnitude never compares as escaped, so an orbit that degenerates
/// to NaN runs out the budget and is reported as [`Escape::Bounded`].
#[inline]
pub fn iterate<F>(z0: DVec2, limits: &EscapeLimits, step: F) -> Escape
where
    F: Fn(DVec2) -> DVec2,
{
    let mut z = z0;
    for k in 1..=limits.max_iterations {
        let magnitude_sq = z.length_squared();
        if magnitude_sq >= limits.radius {
            return Escape::Escaped(smooth(k, magnitude_sq));
        }
        z = step(z);
    }
    Escape::Bounded
}

/// One step of the quadratic map `z^2 + c`.
#[inline]
pub fn quadratic_step(z: DVec2, c: DVec2) -> DVec2 {
    DVec2::new(z.x * z.x - z.y * z.y + c.x, 2.0 * z.x * z.y + c.y)
}

/// One step of `z^n + c` using polar exponentiation.
#[inline]
pub fn power_step(z: DVec2, exponent: f64, c: DVec2) -> DVec2 {
    let r = z.length_squared().powf(exponent / 2.0);
    let (sin, cos) = (exponent * z.y.atan2(z.x)).sin_cos();
    DVec2::new(r * cos + c.x, r * sin + c.y)
}
