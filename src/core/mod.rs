pub mod object_id;
pub mod value;

use std::fmt;

use object_id::ObjectId;
use value::Value;

/// Identity of a loaded document, taken from its `_id` field.
///
/// Equality is by value and strict per type: an `ObjectId` never equals a
/// string, even one spelling the same hex digits.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentId(Value);

impl DocumentId {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        self.0.as_object_id()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::ObjectId(id) => write!(f, "ObjectId(\"{id}\")"),
            Value::Text(text) => write!(f, "{text:?}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<ObjectId> for DocumentId {
    fn from(value: ObjectId) -> Self {
        Self(Value::ObjectId(value))
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(Value::Text(value.to_string()))
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(Value::Text(value))
    }
}

impl From<Value> for DocumentId {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
