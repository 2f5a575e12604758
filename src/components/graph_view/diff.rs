//! Structural diffing used to gate layout recomputation and repaints.
//!
//! The comparison is total and side-effect-free. A `true` result is
//! conservative: a false positive only costs a redundant recomputation,
//! while a false negative would leave a stale render on screen.

use serde::Serialize;
use serde_json::Value;

/// Deep structural comparison of two value trees.
///
/// Objects compare by key set and per-key recursion (insertion order is
/// irrelevant), arrays by length and element-wise recursion, numbers by
/// numeric value (`1` equals `1.0`), everything else by equality.
pub fn is_different(prev: &Value, cur: &Value) -> bool {
	match (prev, cur) {
		(Value::Object(a), Value::Object(b)) => {
			if a.len() != b.len() {
				return true;
			}
			a.iter().any(|(key, va)| match b.get(key) {
				Some(vb) => is_different(va, vb),
				None => true,
			})
		}
		(Value::Array(a), Value::Array(b)) => {
			a.len() != b.len() || a.iter().zip(b.iter()).any(|(va, vb)| is_different(va, vb))
		}
		(Value::Number(a), Value::Number(b)) => a.as_f64() != b.as_f64(),
		(a, b) => a != b,
	}
}

/// Serializes both values and compares them structurally.
///
/// Serialization failures report "different" so the caller recomputes
/// rather than risking a stale render.
pub fn changed<T: Serialize>(prev: &T, cur: &T) -> bool {
	match (serde_json::to_value(prev), serde_json::to_value(cur)) {
		(Ok(a), Ok(b)) => is_different(&a, &b),
		_ => true,
	}
}
