//! Error types for the Formwork core library
//!
//! Two disjoint families live here. [`ValidationError`] describes bad input
//! data and is what callers show to end users; every other [`Error`] variant
//! describes a broken field or serializer definition and is never folded
//! into a validation report.
//!
//! Copyright (c) 2025 Formwork Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Main error type for Formwork operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input data failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A binding-dependent attribute was read before `bind`
    #[error("Unbound field: `{attribute}` is not available on {field_type} until it is bound to a serializer")]
    UnboundField {
        field_type: String,
        attribute: &'static str,
    },

    /// A field raised a failure key missing from its message table
    #[error("Unknown error key `{key}` raised by {field_type}")]
    UnknownErrorKey { field_type: String, key: String },

    /// A field or serializer was declared with an invalid configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// A source path could not be resolved on a native value
    #[error("Attribute error: `{type_name}` has no attribute `{attribute}`")]
    Attribute { type_name: String, attribute: String },

    /// A native value had the wrong shape for the field reading it
    #[error("Native type error: expected {expected}, found `{found}`")]
    NativeType { expected: &'static str, found: String },

    /// JSON bridging errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            field: None,
        }
    }

    /// Attach the offending field name to a configuration error
    pub fn for_field(self, name: &str) -> Self {
        match self {
            Error::Configuration { message, field: None } => Error::Configuration {
                message: format!("{}: {}", name, message),
                field: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// True for data-dependent failures that belong in a user-facing report
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True when the field or serializer definition itself is broken
    pub fn is_programmer_error(&self) -> bool {
        !self.is_validation()
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

/// The shape of a validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// A single failure with its machine-readable key
    Message { code: String, message: String },
    /// Failures keyed by field name, in field order
    Fields(IndexMap<String, ErrorDetail>),
    /// Failures keyed by list position
    Items(BTreeMap<usize, ErrorDetail>),
}

impl ErrorDetail {
    /// Render as `{field: message}` / `{"<index>": ...}` JSON
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ErrorDetail::Message { message, .. } => serde_json::Value::String(message.clone()),
            ErrorDetail::Fields(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, detail)| (name.clone(), detail.to_json()))
                    .collect(),
            ),
            ErrorDetail::Items(items) => serde_json::Value::Object(
                items
                    .iter()
                    .map(|(index, detail)| (index.to_string(), detail.to_json()))
                    .collect(),
            ),
        }
    }

    /// Number of leaf messages contained in this detail
    pub fn count(&self) -> usize {
        match self {
            ErrorDetail::Message { .. } => 1,
            ErrorDetail::Fields(fields) => fields.values().map(ErrorDetail::count).sum(),
            ErrorDetail::Items(items) => items.values().map(ErrorDetail::count).sum(),
        }
    }
}

/// Input data failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    detail: ErrorDetail,
}

impl ValidationError {
    /// A single failure
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Message {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Aggregated per-field failures
    pub fn fields(fields: IndexMap<String, ErrorDetail>) -> Self {
        Self {
            detail: ErrorDetail::Fields(fields),
        }
    }

    /// Aggregated per-element failures
    pub fn items(items: BTreeMap<usize, ErrorDetail>) -> Self {
        Self {
            detail: ErrorDetail::Items(items),
        }
    }

    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    pub fn into_detail(self) -> ErrorDetail {
        self.detail
    }

    /// Failure key of a single-message error
    pub fn code(&self) -> Option<&str> {
        match &self.detail {
            ErrorDetail::Message { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Message of a single-message error
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            ErrorDetail::Message { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Detail recorded for one field of an aggregated error
    pub fn field(&self, name: &str) -> Option<&ErrorDetail> {
        match &self.detail {
            ErrorDetail::Fields(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Detail recorded for one element of a list error
    pub fn item(&self, index: usize) -> Option<&ErrorDetail> {
        match &self.detail {
            ErrorDetail::Items(items) => items.get(&index),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.detail.to_json()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            ErrorDetail::Message { message, .. } => write!(f, "{}", message),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for ErrorDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.detail.serialize(serializer)
    }
}
