//! Request query maps.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Raw value of one query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value, possibly comma-joined.
    Single(String),
    /// Values from a repeated key.
    Many(Vec<String>),
}

impl QueryValue {
    /// Items for a list parameter: repeated values as-is, or a single value
    /// split on commas.
    #[must_use]
    pub fn list_items(&self) -> Vec<&str> {
        match self {
            Self::Single(text) => text.split(',').collect(),
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Value for a scalar parameter; the last of repeated values wins.
    #[must_use]
    pub fn scalar(&self) -> Option<&str> {
        match self {
            Self::Single(text) => Some(text),
            Self::Many(values) => values.last().map(String::as_str),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// Flat string-keyed request map.
///
/// # Example
///
/// ```
/// use vista_plugins::{QueryValue, RequestQuery};
///
/// let query = RequestQuery::from_pairs([("col", "1"), ("col", "2"), ("title", "t")]);
/// assert_eq!(
///     query.get("col"),
///     Some(&QueryValue::Many(vec!["1".into(), "2".into()]))
/// );
/// assert_eq!(query.get("title"), Some(&QueryValue::Single("t".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestQuery(BTreeMap<String, QueryValue>);

impl RequestQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups `(key, value)` pairs, turning repeated keys into
    /// [`QueryValue::Many`].
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Self::new();
        for (key, value) in pairs {
            query.append(key, value);
        }
        query
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Sets a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds a value, promoting the key to multi-valued when repeated.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(QueryValue::Single(value));
            }
            Entry::Occupied(mut slot) => {
                let merged = match slot.get_mut() {
                    QueryValue::Many(values) => {
                        values.push(value);
                        return;
                    }
                    QueryValue::Single(first) => {
                        QueryValue::Many(vec![std::mem::take(first), value])
                    }
                };
                slot.insert(merged);
            }
        }
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// Returns `true` when the query has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for RequestQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}
