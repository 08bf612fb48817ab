//! Typed access to response objects.

use gryphin_core::TYPENAME_FIELD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// An error raised while reading a response.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A non-null field is absent, usually because it was not selected.
    #[error("response is missing field `{key}`")]
    Missing { key: String },

    /// A field holds a value of the wrong shape.
    #[error("failed to decode field `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The value is not a JSON object.
    #[error("expected a JSON object")]
    NotAnObject,

    /// `__typename` names a type outside the possible types.
    #[error("unexpected `__typename` `{typename}` for `{abstract_type}`")]
    UnknownTypename {
        abstract_type: String,
        typename: String,
    },
}

/// A JSON object from a response, read by generated accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseObject(Map<String, JsonValue>);

impl ResponseObject {
    /// Wraps a JSON object.
    #[must_use]
    pub fn new(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }

    /// Wraps a JSON value that must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::NotAnObject`] for any other value.
    pub fn from_value(value: JsonValue) -> Result<Self, ResponseError> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            _ => Err(ResponseError::NotAnObject),
        }
    }

    /// Returns the raw value under a response key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Decodes a non-null field.
    ///
    /// # Errors
    ///
    /// Fails if the key is absent or the value does not decode as `T`.
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, ResponseError> {
        let value = self.get(key).ok_or_else(|| ResponseError::Missing {
            key: key.to_string(),
        })?;
        decode(key, value)
    }

    /// Decodes a nullable field. Absent and `null` both read as `None`.
    ///
    /// # Errors
    ///
    /// Fails if the value does not decode as `T`.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ResponseError> {
        match self.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(value) => decode(key, value).map(Some),
        }
    }

    /// Returns the `__typename` of this object.
    ///
    /// # Errors
    ///
    /// Fails if `__typename` was not selected or is not a string.
    pub fn typename(&self) -> Result<&str, ResponseError> {
        match self.get(TYPENAME_FIELD) {
            Some(JsonValue::String(name)) => Ok(name.as_str()),
            Some(other) => Err(ResponseError::Decode {
                key: TYPENAME_FIELD.to_string(),
                source: <serde_json::Error as serde::de::Error>::custom(format!(
                    "expected a string, found {other}"
                )),
            }),
            None => Err(ResponseError::Missing {
                key: TYPENAME_FIELD.to_string(),
            }),
        }
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, JsonValue> {
        self.0
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: &JsonValue) -> Result<T, ResponseError> {
    T::deserialize(value).map_err(|source| ResponseError::Decode {
        key: key.to_string(),
        source,
    })
}
