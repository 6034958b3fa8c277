//! Deserializers for fields that upstream sends with inconsistent JSON types.
//!
//! Empty strings read as absent so that fallbacks between field names and
//! defaults apply the same way they do for missing keys.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// String, number or boolean rendered as text. Objects and arrays are errors.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected text, found {}",
            kind(&other)
        ))),
    }
}

/// Number or numeric string. Unparseable strings read as absent.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => Ok(s.trim().parse::<f64>().ok().filter(|n| n.is_finite())),
        Some(other) => Err(D::Error::custom(format!(
            "expected number, found {}",
            kind(&other)
        ))),
    }
}

/// Boolean, or the strings `"true"` / `"false"`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::String(s)) => Ok(s.eq_ignore_ascii_case("true")),
        _ => Ok(false),
    }
}

/// Array elements that deserialize into `T`. Non-arrays read as empty and
/// malformed elements are dropped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(error = %err, "dropping malformed list entry");
                None
            }
        })
        .collect())
}

/// Like [`list`], but `None` when the field is missing or not an array so
/// callers can fall back to another field.
pub fn optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(array @ Value::Array(_)) => list(array).map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}
