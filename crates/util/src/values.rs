//! Values coalescing.
//!
//! Computes the effective values of a release from its chart defaults and the
//! user-supplied overrides. Mappings merge recursively, any other override
//! replaces the default, and an explicit `null` override removes the key.

use serde_json::{Map, Value};

/// Deep-merges `overrides` on top of `defaults` and returns the result.
pub fn coalesce_values(defaults: &Value, overrides: &Value) -> Value {
    match (defaults, overrides) {
        (Value::Object(base), Value::Object(top)) => Value::Object(coalesce_maps(base, top)),
        (_, Value::Null) => defaults.clone(),
        _ => overrides.clone(),
    }
}

fn coalesce_maps(base: &Map<String, Value>, top: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in top {
        match (merged.get(key), value) {
            (_, Value::Null) => {
                merged.remove(key);
            }
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                let combined = coalesce_maps(existing, nested);
                merged.insert(key.clone(), Value::Object(combined));
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
