//! Record adapter: a uniform key/value view over template input data.
//!
//! Template data arrives in two shapes: already-dynamic JSON objects (from
//! a parsed generation document) and native structured values (from
//! internal call sites such as the function-doc renderer). Both must
//! present the same map interface to the render engine. [`to_map`] borrows
//! an existing JSON object; [`record_to_map`] projects a `Serialize` record
//! into a fresh map, one level deep. Any other shape is rejected.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A value that cannot be adapted to a key/value view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot use {0} as template data, expected a map or a struct-like record")]
pub struct UnsupportedRecordShape(pub String);

/// Short type name of a JSON value, for diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Borrow the key/value view of a JSON value.
///
/// Objects are returned as-is (aliased, not copied) — callers must treat
/// the map as borrowed and copy explicitly before modifying. Any other
/// shape fails with [`UnsupportedRecordShape`].
pub fn to_map(value: &Value) -> Result<&Map<String, Value>, UnsupportedRecordShape> {
    value
        .as_object()
        .ok_or_else(|| UnsupportedRecordShape(value_kind(value).to_string()))
}

/// Project a native structured record into a fresh map.
///
/// Field names become keys, field values are carried over as-is; nested
/// records stay nested (no recursive flattening). Records that do not
/// serialize to an object fail with [`UnsupportedRecordShape`].
pub fn record_to_map<T: Serialize>(record: &T) -> Result<Map<String, Value>, UnsupportedRecordShape> {
    let value = serde_json::to_value(record)
        .map_err(|e| UnsupportedRecordShape(format!("an unserializable record ({e})")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(UnsupportedRecordShape(value_kind(&other).to_string())),
    }
}
