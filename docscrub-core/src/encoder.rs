// docscrub-core/src/encoder.rs
//! Extended-JSON encoding of sanitized records.
//!
//! Binary payloads and dates have no plain-JSON form that a document store
//! import recognises, so they are wrapped in tagged objects:
//!
//! ```json
//! { "$binary": { "base64": "AQID", "subType": "04" } }
//! { "$date": "2024-03-01T12:00:00.000Z" }
//! ```
//!
//! [`decode_extended`] is the inverse, used when reading store dumps.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use serde_json::json;

use crate::errors::ScrubError;
use crate::value::{Map, Value};

/// Subtype tag written on every `$binary` wrapper.
pub const BINARY_SUBTYPE: &str = "04";

pub const BINARY_KEY: &str = "$binary";
pub const DATE_KEY: &str = "$date";

/// Converts a value to extended JSON. Nested binaries and dates are wrapped
/// too; every other value passes through unchanged.
pub fn to_extended(value: &Value) -> serde_json::Value {
    match value {
        Value::Binary(bytes) => json!({
            BINARY_KEY: { "base64": STANDARD.encode(bytes), "subType": BINARY_SUBTYPE }
        }),
        Value::Date(date) => json!({ DATE_KEY: date.to_rfc3339_opts(SecondsFormat::Millis, true) }),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_extended).collect()),
        Value::Object(map) => serde_json::Value::Object(
            map.iter().map(|(k, v)| (k.clone(), to_extended(v))).collect(),
        ),
        scalar => scalar.to_plain_json(),
    }
}

/// Formats records as a tab-indented extended-JSON array.
pub fn format_records(records: &[Value]) -> Result<String, ScrubError> {
    let json = serde_json::Value::Array(records.iter().map(to_extended).collect());

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ScrubError::SerializationError(e.to_string()))
}

/// Formats records as a compact plain-JSON array.
pub fn format_plain(records: &[Value]) -> Result<String, ScrubError> {
    let json = serde_json::Value::Array(records.iter().map(Value::to_plain_json).collect());
    Ok(serde_json::to_string(&json)?)
}

/// Decodes extended JSON, turning `$binary` and `$date` wrappers back into
/// binary and date values.
pub fn decode_extended(json: serde_json::Value) -> Result<Value, ScrubError> {
    match json {
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if let Some(inner) = map.get(BINARY_KEY) {
                    return decode_binary(inner).map(Value::Binary);
                }
                if let Some(inner) = map.get(DATE_KEY) {
                    return decode_date(inner).map(Value::Date);
                }
            }
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, decode_extended(v)?);
            }
            Ok(Value::Object(out))
        }
        serde_json::Value::Array(items) => Ok(Value::Array(
            items.into_iter().map(decode_extended).collect::<Result<_, _>>()?,
        )),
        scalar => Ok(Value::from(scalar)),
    }
}

fn decode_binary(inner: &serde_json::Value) -> Result<Vec<u8>, ScrubError> {
    let encoded = inner
        .get("base64")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ScrubError::ExtendedJson("'$binary' requires a 'base64' string".to_string()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| ScrubError::ExtendedJson(format!("invalid base64 payload: {}", e)))
}

/// Accepts the relaxed form (RFC 3339 string), the canonical form
/// (`{"$numberLong": "<millis>"}`) and bare epoch milliseconds.
fn decode_date(inner: &serde_json::Value) -> Result<DateTime<Utc>, ScrubError> {
    let millis = match inner {
        serde_json::Value::String(s) => {
            return DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| ScrubError::ExtendedJson(format!("invalid '$date' '{}': {}", s, e)));
        }
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::Object(o) => o
            .get("$numberLong")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<i64>().ok()),
        _ => None,
    };
    millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .ok_or_else(|| ScrubError::ExtendedJson(format!("unsupported '$date' value: {}", inner)))
}
