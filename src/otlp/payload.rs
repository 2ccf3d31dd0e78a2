//! Typed view over a decoded OTLP/JSON trace export.
//!
//! Every accessor is lenient: missing keys, `null`s and values of the wrong
//! JSON type collapse to the documented defaults instead of failing, so the
//! renderer never has to handle absence itself. Array order is preserved.

use serde_json::{Map, Value};

use crate::otlp::value::AttributeValue;

/// Placeholder for absent identifiers, names and timestamps.
pub const UNKNOWN: &str = "unknown";

/// Root of an `ExportTraceServiceRequest`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracePayload {
    pub resource_spans: Vec<ResourceSpan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSpan {
    pub resource_attributes: Vec<Attribute>,
    pub scope_spans: Vec<ScopeSpan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeSpan {
    /// `None` when the payload carries no scope or an empty one.
    pub scope: Option<Scope>,
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub trace_id: String,
    pub span_id: String,
    pub name: String,
    pub kind: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub attributes: Vec<Attribute>,
    pub events: Vec<Event>,
    pub status: Option<Status>,
}

/// A `*TimeUnixNano` field: its text as received plus the integer value
/// when it parses as one.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    pub raw: String,
    pub nanos: Option<i128>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub code: String,
    /// Empty when absent.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
}

impl TracePayload {
    /// Build the typed view. Roots that are not objects yield an empty payload.
    pub fn from_json(root: &Value) -> Self {
        let obj = as_map(root);
        Self {
            resource_spans: list(obj, "resourceSpans")
                .map(ResourceSpan::from_json)
                .collect(),
        }
    }

    /// Number of spans across every resource and scope.
    pub fn span_count(&self) -> usize {
        self.resource_spans
            .iter()
            .flat_map(|rs| &rs.scope_spans)
            .map(|ss| ss.spans.len())
            .sum()
    }
}

impl ResourceSpan {
    fn from_json(raw: &Value) -> Self {
        let obj = as_map(raw);
        let resource = obj.and_then(|o| o.get("resource")).and_then(Value::as_object);
        Self {
            resource_attributes: attributes(resource),
            scope_spans: list(obj, "scopeSpans").map(ScopeSpan::from_json).collect(),
        }
    }
}

impl ScopeSpan {
    fn from_json(raw: &Value) -> Self {
        let obj = as_map(raw);
        let scope = obj
            .and_then(|o| o.get("scope"))
            .and_then(Value::as_object)
            .filter(|s| !s.is_empty())
            .map(|s| Scope {
                name: text(s.get("name")).unwrap_or_else(|| UNKNOWN.to_string()),
                version: text(s.get("version")).unwrap_or_else(|| UNKNOWN.to_string()),
            });
        Self {
            scope,
            spans: list(obj, "spans").map(Span::from_json).collect(),
        }
    }
}

impl Span {
    fn from_json(raw: &Value) -> Self {
        let obj = as_map(raw);
        let field = |key: &str| obj.and_then(|o| o.get(key));
        let or_unknown = |key: &str| text(field(key)).unwrap_or_else(|| UNKNOWN.to_string());

        let status = field("status")
            .and_then(Value::as_object)
            .filter(|s| !s.is_empty())
            .map(|s| Status {
                code: text(s.get("code")).unwrap_or_else(|| UNKNOWN.to_string()),
                message: text(s.get("message")).unwrap_or_default(),
            });

        Self {
            trace_id: or_unknown("traceId"),
            span_id: or_unknown("spanId"),
            name: or_unknown("name"),
            kind: or_unknown("kind"),
            start_time: field("startTimeUnixNano").and_then(Timestamp::from_json),
            end_time: field("endTimeUnixNano").and_then(Timestamp::from_json),
            attributes: attributes(obj),
            events: list(obj, "events")
                .map(|e| {
                    let e = as_map(e);
                    Event {
                        name: text(e.and_then(|e| e.get("name")))
                            .unwrap_or_else(|| UNKNOWN.to_string()),
                        time: text(e.and_then(|e| e.get("timeUnixNano")))
                            .unwrap_or_else(|| UNKNOWN.to_string()),
                    }
                })
                .collect(),
            status,
        }
    }

    /// `(end - start) / 1e6`, only when both timestamps are integers.
    pub fn duration_ms(&self) -> Option<f64> {
        let start = self.start_time.as_ref()?.nanos?;
        let end = self.end_time.as_ref()?.nanos?;
        Some((end - start) as f64 / 1_000_000.0)
    }
}

impl Timestamp {
    fn from_json(raw: &Value) -> Option<Self> {
        let nanos = match raw {
            Value::Null => return None,
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from)),
            Value::String(s) => s.trim().parse::<i128>().ok(),
            _ => None,
        };
        Some(Self {
            raw: text(Some(raw))?,
            nanos,
        })
    }
}

fn as_map(raw: &Value) -> Option<&Map<String, Value>> {
    raw.as_object()
}

/// Elements of the array under `key`; nothing if absent or not an array.
fn list<'a>(obj: Option<&'a Map<String, Value>>, key: &str) -> std::slice::Iter<'a, Value> {
    obj.and_then(|o| o.get(key))
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or_default()
        .iter()
}

/// The `attributes` list of a resource or span.
fn attributes(obj: Option<&Map<String, Value>>) -> Vec<Attribute> {
    list(obj, "attributes")
        .map(|attr| {
            let attr = as_map(attr);
            Attribute {
                key: text(attr.and_then(|a| a.get("key"))).unwrap_or_default(),
                value: attr
                    .and_then(|a| a.get("value"))
                    .map(AttributeValue::from_json)
                    .unwrap_or_else(|| AttributeValue::Unknown("{}".to_string())),
            }
        })
        .collect()
}

/// Display text of a scalar: strings verbatim, anything else as JSON.
/// `None` for absent or `null` values.
fn text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
