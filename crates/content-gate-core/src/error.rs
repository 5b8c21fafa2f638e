//! Error types for the core crate.

use thiserror::Error;

/// Failure while building an [`OriginAllowList`](crate::OriginAllowList).
///
/// Raised once at startup; the validator itself never fails per request.
#[derive(Debug, Error)]
pub enum OriginError {
    #[error("origin pattern must not be empty")]
    EmptyPattern,

    #[error("invalid origin pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure while turning a content record into an index document.
///
/// Missing optional fields never produce one of these; they are defaulted.
/// Every variant here means the host platform handed over data that breaks
/// the record contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("content record must be a JSON object")]
    NotAnObject,

    #[error("{content_type} record has no id")]
    MissingId { content_type: &'static str },

    #[error("{content_type} record id must be an integer or a string, got {found}")]
    InvalidId {
        content_type: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' must be a scalar, got {found}")]
    MalformedField {
        field: String,
        found: &'static str,
    },

    #[error("relation '{field}' must be an array, got {found}")]
    MalformedRelation {
        field: String,
        found: &'static str,
    },
}

/// A content type tag outside the six supported ones.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown content type: '{0}'. Expected one of: industry, blog-post, laboratory, resource, video, team-member")]
pub struct UnknownContentType(pub String);

/// JSON type name used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
