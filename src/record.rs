//! Record model for grid collections
//!
//! Includes RecordId, the Record trait implemented by each screen's row type,
//! DynamicRecord for schema-less rows, and value helpers shared by search,
//! sort and rendering.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridError, Result};

/// Unique identifier of a record, either an integer or text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an id out of a JSON attribute value
    ///
    /// Integers and non-empty strings are ids; anything else (null, empty
    /// string, floats, objects) is treated as "no id".
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// Integer value of the id; text ids are never coerced
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(n) => Some(*n),
            RecordId::Text(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Int(value as i64)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// A row held by a CrudStore and displayed by a TableEngine
///
/// Attribute access goes through serde: the record must serialize to a JSON
/// object whose `id` attribute matches [`Record::id`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Unique identifier within the owning collection
    fn id(&self) -> RecordId;

    /// All attributes of the record, `id` included
    fn properties(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(GridError::invalid_record(format!(
                "Record must serialize to a JSON object, got {}",
                other
            ))),
        }
    }

    /// A single attribute by name
    fn field(&self, key: &str) -> Option<Value> {
        self.properties().ok().and_then(|mut props| props.remove(key))
    }
}

/// Record with dynamic properties, for screens without a concrete row type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicRecord {
    /// Unique identifier
    pub id: RecordId,
    /// Remaining attributes, flattened next to `id` on the wire
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl DynamicRecord {
    /// Create a record with the given properties
    pub fn new(id: impl Into<RecordId>, properties: Map<String, Value>) -> Self {
        let mut properties = properties;
        properties.remove("id");
        Self {
            id: id.into(),
            properties,
        }
    }

    /// Build a record from a JSON object carrying an `id` attribute
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(GridError::invalid_record("Properties must be a JSON object"));
        };
        let id = map
            .remove("id")
            .as_ref()
            .and_then(RecordId::from_value)
            .ok_or_else(|| GridError::invalid_record("Record is missing an id"))?;
        Ok(Self { id, properties: map })
    }

    /// Set one property
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Record for DynamicRecord {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn properties(&self) -> Result<Map<String, Value>> {
        let mut map = Map::with_capacity(self.properties.len() + 1);
        map.insert("id".to_string(), self.id.to_value());
        map.extend(self.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(map)
    }

    fn field(&self, key: &str) -> Option<Value> {
        if key == "id" {
            Some(self.id.to_value())
        } else {
            self.properties.get(key).cloned()
        }
    }
}

// ============================================================================
// Value helpers
// ============================================================================

/// String form of an attribute, as shown in a plain cell and used by search
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Whether a value counts as "not filled in"
///
/// Null, `false`, and the empty string are blank; `0` is a real answer.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
