//! Inbound data normalization helpers.
//!
//! # Responsibility
//! - Accept the loose shapes seen in seed files and backend payloads.
//! - Convert them into canonical typed fields once, at deserialization.
//!
//! # Invariants
//! - List fields accept either a JSON array or a comma-separated string.
//! - Embedded JSON fields accept either a JSON value or a string holding JSON.
//! - `null` and empty strings decode to the field's default.
//! - Timestamps accept epoch milliseconds or an RFC 3339 string and are
//!   stored as epoch milliseconds.

use chrono::DateTime;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum ListRepr {
    Items(Vec<String>),
    Text(String),
}

impl ListRepr {
    fn into_items(self) -> Vec<String> {
        match self {
            Self::Items(items) => clean_items(items),
            Self::Text(text) => split_list(text.as_str()),
        }
    }
}

/// Splits a comma-separated list, trimming and dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    clean_items(value.split(',').map(str::to_string).collect())
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Deserializes a list field from an array, a comma string, or `null`.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<ListRepr>::deserialize(deserializer)?;
    Ok(repr.map(ListRepr::into_items).unwrap_or_default())
}

/// Patch variant of [`string_list`]; `null` means "not present".
pub fn opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<ListRepr>::deserialize(deserializer)?;
    Ok(repr.map(ListRepr::into_items))
}

/// Deserializes a structured field that may arrive as a JSON-encoded string.
pub fn embedded_json<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    decode_embedded(value)
        .map(Option::unwrap_or_default)
        .map_err(D::Error::custom)
}

/// Patch variant of [`embedded_json`]; `null` means "not present".
pub fn opt_embedded_json<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    decode_embedded(value).map_err(D::Error::custom)
}

fn decode_embedded<T: DeserializeOwned>(value: Value) -> Result<Option<T>, serde_json::Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => serde_json::from_str(text.as_str()).map(Some),
        other => serde_json::from_value(other).map(Some),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeRepr {
    Millis(i64),
    Text(String),
}

impl TimeRepr {
    fn into_millis(self) -> Result<Option<i64>, chrono::ParseError> {
        match self {
            Self::Millis(ms) => Ok(Some(ms)),
            Self::Text(text) => parse_timestamp(text.as_str()),
        }
    }
}

/// Parses an RFC 3339 timestamp into epoch milliseconds; blank is `None`.
pub fn parse_timestamp(value: &str) -> Result<Option<i64>, chrono::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(value).map(|parsed| Some(parsed.timestamp_millis()))
}

/// Deserializes a timestamp from epoch milliseconds, RFC 3339 text, or `null` (0).
pub fn epoch_ms<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    opt_epoch_ms(deserializer).map(Option::unwrap_or_default)
}

/// Optional variant of [`epoch_ms`]; `null` and blank text mean "not present".
pub fn opt_epoch_ms<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<TimeRepr>::deserialize(deserializer)? {
        Some(repr) => repr.into_millis().map_err(D::Error::custom),
        None => Ok(None),
    }
}
