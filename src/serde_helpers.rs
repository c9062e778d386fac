//! Typed decoding of normalized payloads.
//!
//! When the `tracing` feature is enabled, fields the target type does not capture
//! are logged as warnings, and a failing decode logs the offending path and value.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Kind};

/// Decodes `value` into `T`, warning about unknown fields.
///
/// A value that does not fit `T` is a [`Kind::Schema`] error.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(type_name = %type_name::<T>(), json = %value, "deserializing JSON");

    let original = value.clone();
    let mut unknown_paths: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| {
        unknown_paths.push(path.to_string());
    })
    .map_err(|e| {
        let json = original.to_string();
        let deserializer = &mut serde_json::Deserializer::from_str(&json);
        let path_result: Result<T, _> = serde_path_to_error::deserialize(deserializer);
        if let Err(path_err) = path_result {
            let path = path_err.path().to_string();
            tracing::error!(
                type_name = %type_name::<T>(),
                path = %path,
                value = %format_value(lookup_value(&original, &path)),
                error = %path_err.inner(),
                "deserialization failed"
            );
        }
        Error::with_source(Kind::Schema, e)
    })?;

    for path in unknown_paths {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %path,
            value = %format_value(lookup_value(&original, &path)),
            "unknown field in API response"
        );
    }

    Ok(result)
}

/// Pass-through decoding when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    serde_json::from_value(value).map_err(|e| Error::with_source(Kind::Schema, e))
}

/// Finds the value at a `serde_ignored` / `serde_path_to_error` path such as
/// `fixtures[3].scores.ft_score` or `teams.0.name`. `?` option markers are skipped.
#[cfg(any(feature = "tracing", test))]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty() && *segment != "?")
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
}

#[cfg(any(feature = "tracing", test))]
fn format_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unable to retrieve>".to_owned(), Value::to_string)
}
