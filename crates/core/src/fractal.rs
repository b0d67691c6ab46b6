//! The `Fractal` trait and the closed set of escape-time fractals.
//!
//! The trait is object-safe so a fractal can be held as `dyn Fractal`, but
//! the frame renderer resolves [`FractalParams`] once per frame and runs a
//! pixel loop that is generic over the concrete evaluator.

use crate::error::RenderError;
use crate::escape::{iterate, power_step, quadratic_step, Escape, EscapeLimits};
use glam::DVec2;
use serde::Serialize;
use serde_json::{json, Value};

/// Default exponent for the power variants.
pub const DEFAULT_EXPONENT: f64 = 2.0;

/// All recognized `FractalType` names.
const FRACTAL_NAMES: &[&str] = &["Julia", "Mandelbrot", "Multibrot", "MultiJulia"];

/// An escape-time fractal: maps a plane coordinate to an [`Escape`].
pub trait Fractal: Sync {
    /// Iterates the fractal's map starting from `z`.
    fn escape(&self, z: DVec2, limits: &EscapeLimits) -> Escape;

    /// Canonical `FractalType` name.
    fn name(&self) -> &'static str;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;
}

/// Quadratic Julia set with a fixed external parameter `c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Julia {
    pub c: DVec2,
}

impl Fractal for Julia {
    fn escape(&self, z: DVec2, limits: &EscapeLimits) -> Escape {
        let c = self.c;
        iterate(z, limits, |z| quadratic_step(z, c))
    }

    fn name(&self) -> &'static str {
        "Julia"
    }

    fn params(&self) -> Value {
        json!({ "real": self.c.x, "imaginary": self.c.y })
    }
}

/// The Mandelbrot set: quadratic map with `c` equal to the starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mandelbrot;

impl Fractal for Mandelbrot {
    fn escape(&self, z: DVec2, limits: &EscapeLimits) -> Escape {
        iterate(z, limits, |w| quadratic_step(w, z))
    }

    fn name(&self) -> &'static str {
        "Mandelbrot"
    }

    fn params(&self) -> Value {
        json!({})
    }
}

/// Multibrot set: `z^n + c` with `c` equal to the starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Multibrot {
    pub exponent: f64,
}

impl Fractal for Multibrot {
    fn escape(&self, z: DVec2, limits: &EscapeLimits) -> Escape {
        let n = self.exponent;
        iterate(z, limits, |w| power_step(w, n, z))
    }

    fn name(&self) -> &'static str {
        "Multibrot"
    }

    fn params(&self) -> Value {
        json!({ "exponent": self.exponent })
    }
}

/// Generalized Julia set: `z^n + c` with a fixed external `c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiJulia {
    pub exponent: f64,
    pub c: DVec2,
}

impl Fractal for MultiJulia {
    fn escape(&self, z: DVec2, limits: &EscapeLimits) -> Escape {
        let (n, c) = (self.exponent, self.c);
        iterate(z, limits, |w| power_step(w, n, c))
    }

    fn name(&self) -> &'static str {
        "MultiJulia"
    }

    fn params(&self) -> Value {
        json!({ "exponent": self.exponent, "real": self.c.x, "imaginary": self.c.y })
    }
}

/// The active fractal for a render. Exactly one variant per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FractalParams {
    Julia(Julia),
    Mandelbrot(Mandelbrot),
    Multibrot(Multibrot),
    MultiJulia(MultiJulia),
}

impl FractalParams {
    /// Constructs a fractal from its `FractalType` name (case-insensitive).
    ///
    /// `c` is ignored by the self-referential variants and `exponent` by the
    /// quadratic ones. Returns `RenderError::UnknownFractal` for any other name.
    pub fn from_name(name: &str, c: DVec2, exponent: f64) -> Result<Self, RenderError> {
        match name.to_ascii_lowercase().as_str() {
            "julia" => Ok(FractalParams::Julia(Julia { c })),
            "mandelbrot" => Ok(FractalParams::Mandelbrot(Mandelbrot)),
            "multibrot" => Ok(FractalParams::Multibrot(Multibrot { exponent })),
            "multijulia" | "multi-julia" => {
                Ok(FractalParams::MultiJulia(MultiJulia { exponent, c }))
            }
            _ => Err(RenderError::UnknownFractal(name.to_string())),
        }
    }

    /// Returns a slice of all recognized fractal names.
    pub fn list_names() -> &'static [&'static str] {
        FRACTAL_NAMES
    }

    /// The external parameter `c`, for the variants that have one.
    pub fn c(&self) -> Option<DVec2> {
        match self {
            FractalParams::Julia(f) => Some(f.c),
            FractalParams::MultiJulia(f) => Some(f.c),
            FractalParams::Mandelbrot(_) | FractalParams::Multibrot(_) => None,
        }
    }

    /// Copy with the external parameter replaced. Self-referential variants
    /// are returned unchanged.
    pub fn with_c(self, c: DVec2) -> Self {
        match self {
            FractalParams::Julia(_) => FractalParams::Julia(Julia { c }),
            FractalParams::MultiJulia(f) => FractalParams::MultiJulia(MultiJulia { c, ..f }),
            other => other,
        }
    }
}

impl Fractal for FractalParams {
    fn escape(&self, z: DVec2, limits: &EscapeLimits) -> Escape {
        match self {
            FractalParams::Julia(f) => f.escape(z, limits),
            FractalParams::Mandelbrot(f) => f.escape(z, limits),
            FractalParams::Multibrot(f) => f.escape(z, limits),
            FractalParams::MultiJulia(f) => f.escape(z, limits),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FractalParams::Julia(f) => f.name(),
            FractalParams::Mandelbrot(f) => f.name(),
            FractalParams::Multibrot(f) => f.name(),
            FractalParams::MultiJulia(f) => f.name(),
        }
    }

    fn params(&self) -> Value {
        match self {
            FractalParams::Julia(f) => f.params(),
            FractalParams::Mandelbrot(f) => f.params(),
            FractalParams::Multibrot(f) => f.params(),
            FractalParams::MultiJulia(f) => f.params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::smooth;

    fn limits(max_iterations: u32) -> EscapeLimits {
        EscapeLimits {
            radius: 4.0,
            max_iterations,
        }
    }

    #[test]
    fn from_name_is_case_insensitive() {
        let f = FractalParams::from_name("mandelbrot", DVec2::ZERO, 2.0).unwrap();
        assert_eq!(f.name(), "Mandelbrot");
        let f = FractalParams::from_name("JULIA", DVec2::new(0.1, 0.2), 2.0).unwrap();
        assert_eq!(f.c(), Some(DVec2::new(0.1, 0.2)));
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = FractalParams::from_name("Sierpinski", DVec2::ZERO, 2.0);
        assert!(matches!(result, Err(RenderError::UnknownFractal(ref n)) if n == "Sierpinski"));
    }

    #[test]
    fn list_names_round_trip_through_from_name() {
        for name in FractalParams::list_names() {
            let f = FractalParams::from_name(name, DVec2::ZERO, 2.0).unwrap();
            assert_eq!(f.name(), *name);
        }
    }

    #[test]
    fn julia_at_origin_with_zero_c_is_bounded() {
        let julia = Julia { c: DVec2::ZERO };
        assert_eq!(julia.escape(DVec2::ZERO, &limits(1000)), Escape::Bounded);
    }

    #[test]
    fn julia_point_outside_radius_escapes_immediately() {
        let julia = Julia {
            c: DVec2::new(-0.8, 0.156),
        };
        let z = DVec2::new(1.5, 1.5);
        assert_eq!(
            julia.escape(z, &limits(1000)),
            Escape::Escaped(smooth(1, 4.5))
        );
    }

    #[test]
    fn julia_attracting_fixed_point_is_bounded() {
        // c = -0.5 has an attracting fixed point near -0.366.
        let julia = Julia {
            c: DVec2::new(-0.5, 0.0),
        };
        assert!(julia
            .escape(DVec2::new(0.1, 0.05), &limits(500))
            .is_bounded());
    }

    #[test]
    fn mandelbrot_corner_escapes_at_first_test() {
        let result = Mandelbrot.escape(DVec2::new(-2.0, -2.0), &limits(50));
        let expected = 2.0 - 8.0_f64.ln().ln() / std::f64::consts::LN_2;
        match result {
            Escape::Escaped(v) => assert!((v - expected).abs() < 1e-12, "got {v}"),
            Escape::Bounded => panic!("corner must escape"),
        }
    }

    #[test]
    fn mandelbrot_main_cardioid_is_bounded() {
        assert!(Mandelbrot.escape(DVec2::new(-0.25, 0.0), &limits(200)).is_bounded());
        assert!(Mandelbrot.escape(DVec2::new(-1.0, 0.0), &limits(200)).is_bounded());
    }

    #[test]
    fn mandelbrot_point_two_escapes() {
        // c = 1 starts at z = 1, then 1 + 1 = 2: |z|^2 = 4 at the second test.
        assert_eq!(
            Mandelbrot.escape(DVec2::new(1.0, 0.0), &limits(50)),
            Escape::Escaped(smooth(2, 4.0))
        );
    }

    #[test]
    fn multibrot_at_two_matches_mandelbrot() {
        let multibrot = Multibrot { exponent: 2.0 };
        for &(x, y) in &[(1.0, 1.0), (0.5, 0.5), (-0.1, 0.1), (-1.0, 0.0)] {
            let z = DVec2::new(x, y);
            let a = Mandelbrot.escape(z, &limits(100));
            let b = multibrot.escape(z, &limits(100));
            match (a, b) {
                (Escape::Bounded, Escape::Bounded) => {}
                (Escape::Escaped(va), Escape::Escaped(vb)) => {
                    assert!((va - vb).abs() < 1e-6, "({x},{y}): {va} vs {vb}")
                }
                _ => panic!("({x},{y}): {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn multijulia_uses_external_parameter() {
        let far = MultiJulia {
            exponent: 3.0,
            c: DVec2::new(5.0, 0.0),
        };
        // 0^3 + 5 lands outside the radius on the second test.
        assert_eq!(
            far.escape(DVec2::ZERO, &limits(10)),
            Escape::Escaped(smooth(2, 25.0))
        );
        let zero = MultiJulia {
            exponent: 3.0,
            c: DVec2::ZERO,
        };
        assert!(zero.escape(DVec2::new(0.5, 0.0), &limits(100)).is_bounded());
    }

    #[test]
    fn with_c_only_touches_external_parameter_variants() {
        let c = DVec2::new(0.25, -0.5);
        let julia = FractalParams::from_name("Julia", DVec2::ZERO, 2.0).unwrap();
        assert_eq!(julia.with_c(c).c(), Some(c));
        let mj = FractalParams::from_name("MultiJulia", DVec2::ZERO, 4.0).unwrap();
        assert_eq!(
            mj.with_c(c),
            FractalParams::MultiJulia(MultiJulia { exponent: 4.0, c })
        );
        let mandel = FractalParams::from_name("Mandelbrot", DVec2::ZERO, 2.0).unwrap();
        assert_eq!(mandel.with_c(c), mandel);
        assert_eq!(mandel.c(), None);
    }

    #[test]
    fn params_reflect_values() {
        let f = FractalParams::from_name("MultiJulia", DVec2::new(0.1, 0.2), 3.0).unwrap();
        let p = f.params();
        assert!((p["exponent"].as_f64().unwrap() - 3.0).abs() < f64::EPSILON);
        assert!((p["real"].as_f64().unwrap() - 0.1).abs() < f64::EPSILON);
        assert!((p["imaginary"].as_f64().unwrap() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn fractal_trait_is_object_safe() {
        let boxed: Box<dyn Fractal> = Box::new(Julia { c: DVec2::ZERO });
        assert_eq!(boxed.name(), "Julia");
        assert!(boxed.escape(DVec2::ZERO, &limits(10)).is_bounded());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn julia_escapes_immediately_outside_radius(
                x in -10.0_f64..10.0,
                y in -10.0_f64..10.0,
                cx in -2.0_f64..2.0,
                cy in -2.0_f64..2.0,
            ) {
                prop_assume!(x * x + y * y >= 4.0);
                let julia = Julia { c: DVec2::new(cx, cy) };
                let result = julia.escape(DVec2::new(x, y), &limits(100));
                prop_assert_eq!(result, Escape::Escaped(smooth(1, x * x + y * y)));
                prop_assert!(result.value().unwrap() >= 0.0);
            }

            #[test]
            fn raising_max_iterations_never_loses_an_escape(
                x in -2.0_f64..2.0,
                y in -2.0_f64..2.0,
                cx in -1.0_f64..1.0,
                cy in -1.0_f64..1.0,
                low in 1_u32..60,
                extra in 0_u32..60,
            ) {
                let julia = Julia { c: DVec2::new(cx, cy) };
                let z = DVec2::new(x, y);
                let a = julia.escape(z, &limits(low));
                let b = julia.escape(z, &limits(low + extra));
                if let Escape::Escaped(va) = a {
                    prop_assert_eq!(b, Escape::Escaped(va));
                }
            }

            #[test]
            fn escaped_values_are_never_negative(
                x in -3.0_f64..3.0,
                y in -3.0_f64..3.0,
            ) {
                if let Escape::Escaped(v) = Mandelbrot.escape(DVec2::new(x, y), &limits(64)) {
                    prop_assert!(v >= 0.0, "negative smoothed value {v}");
                }
            }
        }
    }
}
