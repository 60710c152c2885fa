//! Conversions between documents, JSON and serde types.
//!
//! JSON objects become string-keyed maps and JSON arrays become lists, both
//! declared with element type `any`. Maps built this way are closed by
//! default, so pointers can replace their keys but not add new ones; use the
//! `*_open` variants to allow adding keys.

use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use structptr_core::{Key, KeyKind, List, Map, Type, Value};

use crate::error::{Error, Result};

/// Convert a document to a Rust type via serde.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    // Convert Value to serde_json::Value first, then deserialize
    let json = value_to_json(value);
    serde_json::from_value(json).map_err(Error::Decode)
}

/// Convert a Rust type to a document via serde.
pub fn to_value<T: Serialize>(data: &T) -> Result<Value> {
    let json = serde_json::to_value(data).map_err(Error::Encode)?;
    Ok(json_to_value(json))
}

/// Like [`to_value`], but every map in the result accepts new keys.
pub fn to_open_value<T: Serialize>(data: &T) -> Result<Value> {
    let json = serde_json::to_value(data).map_err(Error::Encode)?;
    Ok(json_to_open_value(json))
}

/// Convert a document to serde_json::Value.
///
/// Non-string map keys are written in their display form and records become
/// objects keyed by declared field name. Bytes are base64 encoded since JSON
/// has no binary type.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(i) => serde_json::Value::Number(i.into()),
        Value::Uint(u) => serde_json::Value::Number(u.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Bytes(b) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&b);
            serde_json::Value::String(encoded)
        }
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (key_to_string(k), value_to_json(v)))
                .collect(),
        ),
        Value::List(list) => {
            serde_json::Value::Array(list.into_items().into_iter().map(value_to_json).collect())
        }
        Value::Array(array) => {
            serde_json::Value::Array(array.into_items().into_iter().map(value_to_json).collect())
        }
        Value::Record(record) => serde_json::Value::Object(
            record
                .into_fields()
                .into_iter()
                .map(|f| {
                    let (name, value) = f.into_parts();
                    (name, value_to_json(value))
                })
                .collect(),
        ),
        Value::Boxed(inner) => value_to_json(*inner),
    }
}

fn key_to_string(key: Key) -> String {
    match key {
        Key::String(s) => s,
        other => other.to_string(),
    }
}

/// Convert serde_json::Value to a document with closed maps.
pub fn json_to_value(json: serde_json::Value) -> Value {
    convert_json(json, false)
}

/// Convert serde_json::Value to a document whose maps accept new keys.
pub fn json_to_open_value(json: serde_json::Value) -> Value {
    convert_json(json, true)
}

fn convert_json(json: serde_json::Value, open: bool) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::Uint(u)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                // Fallback for numbers serde_json can't represent natively
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::List(List::from_items(
            Type::Any,
            arr.into_iter().map(|v| convert_json(v, open)).collect(),
        )),
        serde_json::Value::Object(obj) => {
            let map = obj.into_iter().fold(
                Map::new(KeyKind::String, Type::Any),
                |map, (k, v)| map.with(k, convert_json(v, open)),
            );
            Value::Map(if open { map.open() } else { map })
        }
    }
}
