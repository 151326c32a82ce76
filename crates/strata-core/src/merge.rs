//! Deep merge of configuration trees
//!
//! Only mappings merge key by key. Everything else (scalars, sequences, and
//! values whose variants differ) is replaced wholesale by the overlay, so a
//! later source can always shorten a list or reset a section. An explicit
//! `Null` in the overlay replaces the base value; only a missing key leaves
//! the base untouched.

use crate::value::{Mapping, Value};

/// Merge `overlay` on top of `base`, producing a new tree.
///
/// Neither input is modified. Keys keep base order, followed by keys that
/// only exist in the overlay in overlay order.
///
/// # Example
///
/// ```
/// use strata_core::{Value, merge};
/// use serde_json::json;
///
/// let base = Value::from(json!({"db": {"host": "a", "port": 1}, "tags": [1, 2]}));
/// let overlay = Value::from(json!({"db": {"host": "b"}, "tags": [3]}));
///
/// assert_eq!(
///     merge(&base, &overlay),
///     Value::from(json!({"db": {"host": "b", "port": 1}, "tags": [3]})),
/// );
/// ```
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = Mapping::with_capacity(base_map.len() + overlay_map.len());
            for (key, base_value) in base_map {
                let value = match overlay_map.get(key) {
                    Some(overlay_value) => merge(base_value, overlay_value),
                    None => base_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            for (key, overlay_value) in overlay_map {
                if !base_map.contains_key(key) {
                    merged.insert(key.clone(), overlay_value.clone());
                }
            }
            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge `overlay` into `base` in place, consuming the overlay.
///
/// Same semantics as [`merge`]; used where the accumulated tree is owned.
pub fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => merge_into(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Fold trees left to right, starting from an empty mapping.
///
/// Later trees take precedence over earlier ones.
pub fn fold<'a, I>(trees: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    trees
        .into_iter()
        .fold(Value::mapping(), |acc, tree| merge(&acc, tree))
}
