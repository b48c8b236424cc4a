//! Conversion between [`Value`] and `serde_json::Value`.

use serde_json::{Map, Number};

use crate::path::KeyPath;
use crate::record::Record;
use crate::tag::ObjectTag;
use crate::value::{safe_integer, Value};

/// Conversion errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConvertError {
    #[error("opaque {tag} at {path} has no JSON representation")]
    Unrepresentable { path: KeyPath, tag: ObjectTag },

    #[error("non-finite number {value} at {path}")]
    NonFinite { path: KeyPath, value: f64 },
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Record>(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = ConvertError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        to_json(value, &mut KeyPath::root())
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = ConvertError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        to_json(value.clone(), &mut KeyPath::root())
    }
}

fn to_json(value: Value, path: &mut KeyPath) -> Result<serde_json::Value, ConvertError> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Number(n) => serde_json::Value::Number(number(n, path)?),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push_index(i);
                out.push(to_json(item, path)?);
                path.pop();
            }
            serde_json::Value::Array(out)
        }
        Value::Record(record) => {
            let mut out = Map::new();
            for (key, item) in record {
                path.push_key(key.clone());
                out.insert(key, to_json(item, path)?);
                path.pop();
            }
            serde_json::Value::Object(out)
        }
        Value::Opaque(handle) => {
            return Err(ConvertError::Unrepresentable {
                path: path.clone(),
                tag: handle.tag().clone(),
            });
        }
    })
}

fn number(n: f64, path: &KeyPath) -> Result<Number, ConvertError> {
    if !n.is_finite() {
        return Err(ConvertError::NonFinite {
            path: path.clone(),
            value: n,
        });
    }
    if let Some(i) = safe_integer(n) {
        return Ok(Number::from(i));
    }
    Number::from_f64(n).ok_or(ConvertError::NonFinite {
        path: path.clone(),
        value: n,
    })
}
