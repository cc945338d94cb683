//! Lenient deserializers for provider fields.
//!
//! The provider is inconsistent about quoting: `expires_in`, result codes and
//! response codes arrive as JSON strings on some endpoints and as numbers on
//! others.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// Deserializes a string, integer or `null` into a `String`.
///
/// `null` becomes the empty string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("expected string or number, got {other}"))),
    }
}

/// Deserializes an unsigned integer given either as a number or a decimal string.
pub(crate) fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => {
            n.as_u64().ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {n}")))
        }
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid integer string '{s}': {e}"))),
        other => Err(D::Error::custom(format!("expected integer or string, got {other}"))),
    }
}
