//! Mapping typed parameter structs onto query strings

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Flatten a serializable struct into query pairs
///
/// `None` fields are skipped, scalars are rendered as text and arrays are
/// joined with commas. Nested objects are rejected.
pub fn to_query_pairs<P: Serialize + ?Sized>(params: &P) -> Result<Vec<(String, String)>> {
    let map = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::config(format!(
                "query parameters must serialize to an object, got {other}"
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        if let Some(text) = scalar_text(&key, value)? {
            pairs.push((key, text));
        }
    }
    Ok(pairs)
}

fn scalar_text(key: &str, value: Value) -> Result<Option<String>> {
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match scalar_text(key, item)? {
                    Some(part) => parts.push(part),
                    None => continue,
                }
            }
            Some(parts.join(","))
        }
        Value::Object(_) => {
            return Err(Error::config(format!(
                "query parameter '{key}' cannot be a nested object"
            )))
        }
    })
}
