use indexmap::IndexMap;
use serde_json::{Map, Number};

use crate::core::object_id::{ObjectId, ObjectIdParseError};

const OID_KEY: &str = "$oid";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
    ObjectId(ObjectId),
    Object(IndexMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.is_empty(),
            Self::Object(v) => v.is_empty(),
            Self::List(v) => v.is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "Null",
            Self::Bool(_) => "Boolean",
            Self::Int(_) | Self::Number(_) => "Number",
            Self::Text(_) => "String",
            Self::ObjectId(_) => "ObjectId",
            Self::Object(_) => "Object",
            Self::List(_) => "Array",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    /// Converts extended JSON, mapping `{"$oid": "..."}` to [`Value::ObjectId`].
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ObjectIdParseError> {
        Ok(match json {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(int) => Self::Int(int),
                None => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(items) => Self::List(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            serde_json::Value::Object(map) => {
                if map.len() == 1
                    && let Some(serde_json::Value::String(hex)) = map.get(OID_KEY)
                {
                    return Ok(Self::ObjectId(ObjectId::parse_str(hex)?));
                }
                let mut out = IndexMap::with_capacity(map.len());
                for (key, child) in map {
                    out.insert(key.clone(), Self::from_json(child)?);
                }
                Self::Object(out)
            }
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::None => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::Number(Number::from(*n)),
            Self::Number(n) => Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::ObjectId(id) => {
                let mut map = Map::new();
                map.insert(OID_KEY.to_string(), serde_json::Value::String(id.to_hex()));
                serde_json::Value::Object(map)
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Self::ObjectId(value)
    }
}
