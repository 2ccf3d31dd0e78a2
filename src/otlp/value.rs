//! Attribute values as carried by OTLP/JSON.
//!
//! OTLP encodes an `AnyValue` as an object with exactly one of
//! `stringValue`, `intValue`, `doubleValue`, `boolValue`, `arrayValue`,
//! `kvlistValue` or `bytesValue`. 64-bit integers usually arrive as
//! decimal strings, doubles may arrive as `"NaN"`/`"Infinity"`.

use serde_json::Value;
use std::fmt;

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Array(Vec<AttributeValue>),
    KvList(Vec<(String, AttributeValue)>),
    Bytes(String),
    /// Anything else, kept as its JSON text.
    Unknown(String),
}

impl AttributeValue {
    /// Decode a raw `AnyValue` object. Never fails: shapes that cannot be
    /// recognised become [`AttributeValue::Unknown`].
    pub fn from_json(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return Self::Unknown(raw.to_string());
        };
        let unknown = || Self::Unknown(raw.to_string());

        if let Some(v) = obj.get("stringValue") {
            return match v {
                Value::String(s) => Self::String(s.clone()),
                other => Self::String(other.to_string()),
            };
        }
        if let Some(v) = obj.get("intValue") {
            return parse_int(v).map(Self::Int).unwrap_or_else(unknown);
        }
        if let Some(v) = obj.get("doubleValue") {
            return parse_double(v).map(Self::Double).unwrap_or_else(unknown);
        }
        if let Some(v) = obj.get("boolValue") {
            return match v {
                Value::Bool(b) => Self::Bool(*b),
                Value::String(s) if s == "true" => Self::Bool(true),
                Value::String(s) if s == "false" => Self::Bool(false),
                _ => unknown(),
            };
        }
        if let Some(v) = obj.get("arrayValue") {
            let values = v
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(Self::from_json).collect())
                .unwrap_or_default();
            return Self::Array(values);
        }
        if let Some(v) = obj.get("kvlistValue") {
            let entries = v
                .get("values")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .map(|kv| {
                            let key = kv
                                .get("key")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string();
                            let value = kv
                                .get("value")
                                .map(Self::from_json)
                                .unwrap_or_else(|| Self::Unknown("{}".to_string()));
                            (key, value)
                        })
                        .collect()
                })
                .unwrap_or_default();
            return Self::KvList(entries);
        }
        if let Some(Value::String(b)) = obj.get("bytesValue") {
            return Self::Bytes(b.clone());
        }

        unknown()
    }
}

fn parse_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_double(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Bytes(s) | Self::Unknown(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps the trailing `.0` on integral doubles
            Self::Double(d) => write!(f, "{d:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::KvList(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Render a raw `AnyValue` object as display text.
pub fn format_value(raw: &Value) -> String {
    AttributeValue::from_json(raw).to_string()
}
