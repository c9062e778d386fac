//! Removal of the `{"data": ...}` wrapper convention.
//!
//! SportMonks wraps every payload, and every embedded include, in an object
//! whose only key is `data`. For example `{"countries": {"data": [..]}}` becomes
//! `{"countries": [..]}` once normalized. Records themselves, i.e. list
//! elements and the payload of the envelope, may carry a field named `data`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Result;
use crate::error::Error;

pub(crate) const DATA: &str = "data";

/// A JSON object with string keys.
pub type Object = Map<String, Value>;

/// Replaces a top-level envelope with its `data` payload.
///
/// Sibling keys such as `meta` are dropped here; a body without `data` is
/// returned unchanged.
#[must_use]
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(DATA) => map.remove(DATA).unwrap_or(Value::Null),
        other => other,
    }
}

/// Recursively strips `data` wrappers below a record.
///
/// `value` is taken as a record: its own keys are kept even when one of them is
/// `data`, and only the values of its keys (and the elements of lists) are
/// unwrapped. A key's value containing `data` must contain nothing else;
/// otherwise this fails with a [`Kind::Schema`](crate::error::Kind::Schema)
/// error instead of dropping the siblings. Applying it twice gives the same
/// result as once.
pub fn normalize(value: Value) -> Result<Value> {
    match value {
        Value::Object(map) => normalize_fields(map),
        Value::Array(items) => normalize_records(items),
        scalar => Ok(scalar),
    }
}

fn normalize_records(items: Vec<Value>) -> Result<Value> {
    items
        .into_iter()
        .map(normalize)
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn normalize_fields(map: Object) -> Result<Value> {
    let mut normalized = Object::with_capacity(map.len());
    for (key, value) in map {
        normalized.insert(key, normalize_field(value)?);
    }
    Ok(Value::Object(normalized))
}

/// Unwraps the value of a key; nested wrappers collapse into one.
fn normalize_field(value: Value) -> Result<Value> {
    match value {
        Value::Object(mut map) if map.contains_key(DATA) => {
            if map.len() > 1 {
                let siblings = map
                    .keys()
                    .filter(|key| *key != DATA)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(Error::schema(format!(
                    "cannot flatten an object having keys other than `data`: {siblings}"
                )));
            }
            normalize_field(map.remove(DATA).unwrap_or(Value::Null))
        }
        other => normalize(other),
    }
}

/// A fully normalized response: either one object or a list of records.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Object(Object),
    List(Vec<Value>),
}

impl Normalized {
    /// Unwraps the envelope, normalizes the payload and checks its shape.
    pub fn try_from_body(body: Value) -> Result<Self> {
        match normalize(unwrap_envelope(body))? {
            Value::Object(map) => Ok(Self::Object(map)),
            Value::Array(items) => Ok(Self::List(items)),
            other => Err(Error::schema(format!(
                "unable to flatten data of type `{}`, expected an object or a list",
                json_type(&other)
            ))),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Object(map) => map.len(),
            Self::List(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(map) => Some(map),
            Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::Object(_) => None,
            Self::List(items) => Some(items),
        }
    }

    pub fn into_object(self) -> Result<Object> {
        match self {
            Self::Object(map) => Ok(map),
            Self::List(_) => Err(Error::schema("expected an object, got a list")),
        }
    }

    /// Returns the records; an empty object (the upstream's "nothing found") is an empty list.
    pub fn into_list(self) -> Result<Vec<Value>> {
        match self {
            Self::List(items) => Ok(items),
            Self::Object(map) if map.is_empty() => Ok(Vec::new()),
            Self::Object(_) => Err(Error::schema("expected a list, got an object")),
        }
    }

    /// Removes and returns `key` from an object response.
    pub fn take(self, key: &str) -> Result<Value> {
        let mut map = self.into_object()?;
        map.remove(key)
            .ok_or_else(|| Error::schema(format!("missing key `{key}` in response")))
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map),
            Self::List(items) => Value::Array(items),
        }
    }

    /// Decodes the normalized payload into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        crate::serde_helpers::deserialize_with_warnings(self.into_value())
    }
}

impl From<Normalized> for Value {
    fn from(value: Normalized) -> Self {
        value.into_value()
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
