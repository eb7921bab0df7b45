//! Resolved values and the per-request resource map.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::object::DomainObject;

/// A typed value produced by resolution.
#[derive(Clone)]
pub enum ResolvedValue {
    /// No value and no default.
    Null,
    /// Sanitised text.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// JSON with sanitised string leaves.
    Json(serde_json::Value),
    /// A domain object returned by the domain-object resolver.
    Object(Arc<dyn DomainObject>),
    /// Resolved items of a list parameter.
    List(Vec<ResolvedValue>),
}

impl ResolvedValue {
    /// Returns `true` for [`ResolvedValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the domain object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Arc<dyn DomainObject>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts to JSON; `None` when a domain object is involved.
    #[must_use]
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Self::Null => Some(serde_json::Value::Null),
            Self::Text(text) => Some(serde_json::Value::String(text.clone())),
            Self::Bool(flag) => Some(serde_json::Value::Bool(*flag)),
            Self::Int(value) => Some(serde_json::Value::from(*value)),
            Self::Float(value) => Some(serde_json::Value::from(*value)),
            Self::Json(value) => Some(value.clone()),
            Self::Object(_) => None,
            Self::List(items) => items
                .iter()
                .map(Self::to_json)
                .collect::<Option<Vec<_>>>()
                .map(serde_json::Value::Array),
        }
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bool(flag) => f.debug_tuple("Bool").field(flag).finish(),
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(&object.text()).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl PartialEq for ResolvedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

/// Resolved resources keyed by (possibly renamed) parameter key.
///
/// Built fresh for each request and owned by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceMap(BTreeMap<String, ResolvedValue>);

impl ResourceMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value.
    pub fn insert(&mut self, key: impl Into<String>, value: ResolvedValue) {
        self.0.insert(key.into(), value);
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        self.0.get(key)
    }

    /// Returns `true` when the key has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts to a JSON object; `None` when any entry is a domain object.
    #[must_use]
    pub fn to_json(&self) -> Option<serde_json::Value> {
        self.0
            .iter()
            .map(|(key, value)| value.to_json().map(|json| (key.clone(), json)))
            .collect::<Option<serde_json::Map<_, _>>>()
            .map(serde_json::Value::Object)
    }

    /// Unwraps the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, ResolvedValue> {
        self.0
    }
}
