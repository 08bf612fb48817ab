//! Errors raised while building a type graph.

use thiserror::Error;

/// Coarse classification of a [`SchemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input does not have the introspection shape.
    Format,
    /// A reference names a type that is absent or of the wrong kind.
    Reference,
    /// A `kind` tag outside the recognized set.
    UnknownKind,
}

/// An error that aborts a generation run.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema text is not valid JSON.
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON does not match the introspection shape.
    #[error("invalid schema at `{path}`: {message}")]
    Format { path: String, message: String },

    /// A reference names a type that was never declared.
    #[error("`{referrer}` references unknown type `{name}`")]
    Reference { referrer: String, name: String },

    /// A reference disagrees with the declared kind of its target.
    #[error("`{referrer}` references `{name}` as {expected}, but it is declared as {actual}")]
    KindMismatch {
        referrer: String,
        name: String,
        expected: String,
        actual: String,
    },

    /// A type or reference reports an unrecognized `kind`.
    #[error("unknown type kind `{kind}` at `{location}`")]
    UnknownKind { kind: String, location: String },
}

impl SchemaError {
    pub(crate) fn format(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the taxonomy tag of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Json(_) | Self::Format { .. } => ErrorKind::Format,
            Self::Reference { .. } | Self::KindMismatch { .. } => ErrorKind::Reference,
            Self::UnknownKind { .. } => ErrorKind::UnknownKind,
        }
    }
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
