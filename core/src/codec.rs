//! Wire encodings shared by the bundled transports.
//!
//! Query strings and form bodies are flattened in bracket style: arrays
//! become repeated `key[]` pairs and nested objects become `key[sub]`
//! pairs, recursively. `null` encodes as an empty value.

use serde_json::{Map, Value};

/// Flatten a mapping into ordered `(name, value)` pairs for urlencoding.
pub fn flatten_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in map {
        push_pairs(&mut pairs, key.clone(), value);
    }
    pairs
}

fn push_pairs(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_pairs(pairs, format!("{key}[]"), item);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                push_pairs(pairs, format!("{key}[{field}]"), item);
            }
        }
        Value::Null => pairs.push((key, String::new())),
        Value::String(s) => pairs.push((key, s.clone())),
        other => pairs.push((key, other.to_string())),
    }
}

/// Decode a response body as JSON. An empty body decodes to `null`.
pub fn decode_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}

/// Decode a header value byte-for-byte as Latin-1.
///
/// Visible ASCII comes through unchanged; obs-text bytes map to U+0080..U+00FF.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
