//! Field normalization
//!
//! Maps a wire-format record (alternate field spellings, string-encoded
//! timestamps) into the canonical typed shape for its kind. Pure; no
//! storage access.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Syncable;

/// Normalize one wire record into its canonical typed form.
///
/// Known alternate spellings are renamed via the kind's static alias
/// table, and string-encoded timestamp fields are parsed leniently: an
/// unparseable value degrades to null instead of rejecting the record.
/// A missing `id` or a structurally malformed record fails with
/// [`Error::Validation`].
pub fn normalize<T>(raw: Value) -> Result<T>
where
    T: Syncable + DeserializeOwned,
{
    let Value::Object(fields) = raw else {
        return Err(Error::Validation(format!(
            "{} record must be a JSON object",
            T::KIND
        )));
    };

    let mut canonical = Map::with_capacity(fields.len());
    for (key, value) in fields {
        let name = T::FIELD_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or(key, |(_, to)| (*to).to_string());
        canonical.insert(name, value);
    }

    for field in T::TIMESTAMP_FIELDS {
        if let Some(value) = canonical.get_mut(*field) {
            *value = match value.take() {
                Value::String(text) => parse_instant_ms(&text).map_or(Value::Null, Value::from),
                Value::Number(n) => Value::Number(n),
                _ => Value::Null,
            };
        }
    }

    if !canonical.get("id").is_some_and(Value::is_string) {
        return Err(Error::Validation(format!(
            "{} record is missing its id",
            T::KIND
        )));
    }

    serde_json::from_value(Value::Object(canonical))
        .map_err(|e| Error::Validation(format!("malformed {} record: {e}", T::KIND)))
}

/// Parse a textual timestamp to Unix milliseconds.
///
/// RFC 3339 first; zone-less values are assumed UTC.
fn parse_instant_ms(text: &str) -> Option<i64> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc).timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    None
}
