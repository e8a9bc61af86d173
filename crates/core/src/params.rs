//! Lenient typed lookups on a JSON params object.
//!
//! Sketch configuration arrives as loose JSON (CLI `--params`, seed files,
//! the browser). Every helper falls back to the caller's default when a key
//! is missing or has the wrong shape; configuration never fails.

use serde_json::Value;

/// `params[name]` as `f64`, or `default`. Non-finite values are rejected.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// `params[name]` as a non-negative integer, or `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as a probability clamped to [0, 1], or `default`.
pub fn param_chance(params: &Value, name: &str, default: f64) -> f64 {
    param_f64(params, name, default).clamp(0.0, 1.0)
}

/// `params[name]` as a `[min, max]` pair, or `default`.
///
/// Accepts a two-element numeric array; the pair is reordered if reversed.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    let Some(items) = params.get(name).and_then(Value::as_array) else {
        return default;
    };
    match items.as_slice() {
        [lo, hi] => match (lo.as_f64(), hi.as_f64()) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => (a.min(b), a.max(b)),
            _ => default,
        },
        _ => default,
    }
}
