//! Page payload normalization
//!
//! Endpoints disagree about shape: some return a bare array, some wrap it
//! in `data` or `items`, and single-resource endpoints return one bare
//! object. Everything is reduced to a flat record vector.

use crate::types::JsonValue;

/// Normalize one page's payload into a record vector.
///
/// - a bare array is returned as-is,
/// - a `data` or `items` array property is unwrapped (checked in that
///   order),
/// - anything else becomes a single-element vector.
pub fn records(body: JsonValue) -> Vec<JsonValue> {
    match body {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut map) => {
            for key in ["data", "items"] {
                if matches!(map.get(key), Some(JsonValue::Array(_))) {
                    if let Some(JsonValue::Array(items)) = map.remove(key) {
                        return items;
                    }
                }
            }
            vec![JsonValue::Object(map)]
        }
        other => vec![other],
    }
}
