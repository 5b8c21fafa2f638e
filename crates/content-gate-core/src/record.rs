//! Populated content records.
//!
//! A [`ContentRecord`] is one entry as the CMS hands it over after resolving
//! the relations named in the content type's populate directive. Nothing in
//! this crate fetches related data; a relation that was not populated simply
//! reads as empty.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::DocumentId;
use crate::error::{json_kind, TransformError};

/// Field holding the record's primary identifier.
pub const ID_FIELD: &str = "id";

/// A single populated content entry, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ContentRecord {
    fields: Map<String, Value>,
}

impl ContentRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, TransformError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(TransformError::NotAnObject),
        }
    }

    /// Raw field access.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The record identifier, copied verbatim.
    ///
    /// `content_type` only labels the error. There is no default: a record
    /// without an id cannot be upserted and is reported as a data error.
    pub fn id(&self, content_type: &'static str) -> Result<DocumentId, TransformError> {
        match self.fields.get(ID_FIELD) {
            None | Some(Value::Null) => Err(TransformError::MissingId { content_type }),
            Some(Value::Number(n)) => match (n.as_i64(), n.as_u64()) {
                (Some(id), _) => Ok(DocumentId::Int(id)),
                (None, Some(id)) => Ok(DocumentId::UInt(id)),
                (None, None) => Err(TransformError::InvalidId {
                    content_type,
                    found: "non-integer number",
                }),
            },
            Some(Value::String(s)) if s.is_empty() => Err(TransformError::MissingId { content_type }),
            Some(Value::String(s)) => Ok(DocumentId::Text(s.clone())),
            Some(other) => Err(TransformError::InvalidId {
                content_type,
                found: json_kind(other),
            }),
        }
    }

    /// A scalar text field, or `""` when absent or null.
    ///
    /// Numbers and booleans are rendered in their JSON form.
    pub fn text(&self, field: &str) -> Result<String, TransformError> {
        scalar_text(self.fields.get(field), field)
    }

    /// A populated relation, or an empty slice when absent or null.
    pub fn relation(&self, field: &str) -> Result<&[Value], TransformError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(TransformError::MalformedRelation {
                field: field.to_string(),
                found: json_kind(other),
            }),
        }
    }
}

impl From<Map<String, Value>> for ContentRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

impl TryFrom<Value> for ContentRecord {
    type Error = TransformError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

pub(crate) fn scalar_text(value: Option<&Value>, field: &str) -> Result<String, TransformError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(TransformError::MalformedField {
            field: field.to_string(),
            found: json_kind(other),
        }),
    }
}
