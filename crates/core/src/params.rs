//! Typed accessors for the flat key-value configuration object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key
//! (or an explicit `null`) yields the default; a key holding the wrong JSON
//! type is a [`RenderError::ParamTypeMismatch`] so that typos in a config
//! file surface at startup instead of silently rendering something else.

use crate::error::RenderError;
use serde_json::Value;

/// Human-readable JSON type name used in mismatch errors.
fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_u64() => "integer",
        Value::Number(n) if n.is_i64() => "negative integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> RenderError {
    RenderError::ParamTypeMismatch {
        name: name.to_owned(),
        expected: expected.to_owned(),
        got: describe(got).to_owned(),
    }
}

/// Returns the value under `name`, treating `null` as absent.
fn lookup<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

/// Extracts an `f64` from `params[name]`.
///
/// Accepts both JSON floats and integers.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, RenderError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| mismatch(name, "number", v)),
    }
}

/// Extracts an `f64` from the first of `names` present in `params`.
///
/// Used for keys that carry a legacy alias (`EscapeRadius` / `Radius`).
pub fn param_f64_any(params: &Value, names: &[&str], default: f64) -> Result<f64, RenderError> {
    match names.iter().find(|name| lookup(params, name).is_some()) {
        Some(name) => param_f64(params, name, default),
        None => Ok(default),
    }
}

/// Extracts a `u32` from `params[name]`.
///
/// Only non-negative integers that fit in `u32` are accepted.
pub fn param_u32(params: &Value, name: &str, default: u32) -> Result<u32, RenderError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| mismatch(name, "unsigned 32-bit integer", v)),
    }
}

/// Extracts a `usize` from `params[name]`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, RenderError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| mismatch(name, "unsigned integer", v)),
    }
}

/// Extracts a `bool` from `params[name]`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> Result<bool, RenderError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v.as_bool().ok_or_else(|| mismatch(name, "bool", v)),
    }
}

/// Extracts a `String` from `params[name]`.
pub fn param_string(params: &Value, name: &str, default: &str) -> Result<String, RenderError> {
    match lookup(params, name) {
        None => Ok(default.to_owned()),
        Some(v) => v
            .as_str()
            .map(String::from)
            .ok_or_else(|| mismatch(name, "string", v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"OffsetX": 2.5});
        assert!((param_f64(&params, "OffsetX", 1.0).unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"ScaleX": 10});
        assert!((param_f64(&params, "ScaleX", 0.0).unwrap() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_key_missing() {
        let params = json!({"other": 1.0});
        assert!((param_f64(&params, "Real", 3.0).unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_null_value() {
        let params = json!({"Real": null});
        assert!((param_f64(&params, "Real", 5.0).unwrap() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_rejects_wrong_type() {
        let params = json!({"Real": "half"});
        let err = param_f64(&params, "Real", 1.0).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ParamTypeMismatch { ref name, ref got, .. } if name == "Real" && got == "string"
        ));
    }

    #[test]
    fn param_f64_any_prefers_first_present_key() {
        let params = json!({"EscapeRadius": 9.0, "Radius": 16.0});
        let r = param_f64_any(&params, &["EscapeRadius", "Radius"], 4.0).unwrap();
        assert!((r - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_any_falls_back_to_alias() {
        let params = json!({"Radius": 16.0});
        let r = param_f64_any(&params, &["EscapeRadius", "Radius"], 4.0).unwrap();
        assert!((r - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_any_returns_default_when_no_alias_present() {
        let params = json!({});
        let r = param_f64_any(&params, &["EscapeRadius", "Radius"], 4.0).unwrap();
        assert!((r - 4.0).abs() < f64::EPSILON);
    }

    // -- param_u32 / param_usize --

    #[test]
    fn param_u32_extracts_existing_integer() {
        let params = json!({"MaxIterations": 42});
        assert_eq!(param_u32(&params, "MaxIterations", 0).unwrap(), 42);
    }

    #[test]
    fn param_u32_rejects_float_value() {
        let params = json!({"MaxIterations": 2.5});
        assert!(param_u32(&params, "MaxIterations", 99).is_err());
    }

    #[test]
    fn param_u32_rejects_negative_integer() {
        let params = json!({"MaxIterations": -1});
        let err = param_u32(&params, "MaxIterations", 5).unwrap_err();
        assert!(err.to_string().contains("negative integer"), "got: {err}");
    }

    #[test]
    fn param_u32_rejects_out_of_range() {
        let params = json!({"MaxIterations": 5_000_000_000u64});
        assert!(param_u32(&params, "MaxIterations", 5).is_err());
    }

    #[test]
    fn param_usize_returns_default_when_key_missing() {
        let params = json!({});
        assert_eq!(param_usize(&params, "Width", 10).unwrap(), 10);
    }

    #[test]
    fn param_usize_rejects_string_value() {
        let params = json!({"Width": "many"});
        assert!(param_usize(&params, "Width", 8).is_err());
    }

    // -- param_bool --

    #[test]
    fn param_bool_extracts_true() {
        let params = json!({"Animate": true});
        assert!(param_bool(&params, "Animate", false).unwrap());
    }

    #[test]
    fn param_bool_returns_default_when_key_missing() {
        let params = json!({});
        assert!(param_bool(&params, "AdjustForAspectRatio", true).unwrap());
    }

    #[test]
    fn param_bool_rejects_integer() {
        let params = json!({"Animate": 1});
        assert!(param_bool(&params, "Animate", false).is_err());
    }

    // -- param_string --

    #[test]
    fn param_string_extracts_existing_string() {
        let params = json!({"FractalType": "Mandelbrot"});
        assert_eq!(
            param_string(&params, "FractalType", "Julia").unwrap(),
            "Mandelbrot"
        );
    }

    #[test]
    fn param_string_returns_default_when_key_missing() {
        let params = json!({});
        assert_eq!(param_string(&params, "FractalType", "Julia").unwrap(), "Julia");
    }

    #[test]
    fn param_string_rejects_number() {
        let params = json!({"FractalType": 42});
        assert!(param_string(&params, "FractalType", "Julia").is_err());
    }

    #[test]
    fn param_string_handles_empty_string_value() {
        let params = json!({"InterpolationType": ""});
        assert_eq!(
            param_string(&params, "InterpolationType", "cosine").unwrap(),
            ""
        );
    }

    #[test]
    fn non_object_params_yield_defaults() {
        let params = json!("not an object");
        assert!((param_f64(&params, "Real", 7.0).unwrap() - 7.0).abs() < f64::EPSILON);
    }
}
