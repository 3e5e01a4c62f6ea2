//! Value representations produced by generated strategies.
//!
//! This module defines [`Value`], the dynamic, schema-agnostic value that every
//! converted strategy yields, and [`Context`], the read-only bag of settings
//! passed to validators and post-load transforms.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Dynamic value produced by a schema strategy.
///
/// `Value` mirrors the schema categories: scalars, temporal values,
/// sequences, mappings with arbitrary keys and records with named fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (optional wrappers)
    Null,

    /// Boolean value
    Bool(bool),

    /// Whole number
    Int(i64),

    /// Floating point number
    Float(f64),

    /// Text value
    String(String),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Variable-length sequence
    List(Vec<Value>),

    /// Fixed-arity sequence
    Tuple(Vec<Value>),

    /// Mapping with arbitrary keys, in generation order
    Map(Vec<(Value, Value)>),

    /// Record with named fields
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the items of a list or tuple.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get the entries of a mapping.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get the fields of a record.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Look up a mapping entry or record field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(fields) => fields.get(key),
            Self::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Length of a sized value: characters of a string, items of a
    /// sequence, entries of a mapping or fields of a record.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::List(items) | Self::Tuple(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            Self::Object(fields) => Some(fields.len()),
            _ => None,
        }
    }

    /// Compare two values of compatible kinds.
    ///
    /// Numbers compare across `Int`/`Float`; strings and temporal values
    /// compare within their own kind. Returns `None` otherwise.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::DateTime(_) => "datetime",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::DateTime(dt) => dt.serialize(serializer),
            Self::Date(d) => d.serialize(serializer),
            Self::Time(t) => t.serialize(serializer),
            Self::List(items) | Self::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Object(fields) => fields.serialize(serializer),
        }
    }
}

/// Read-only settings passed through conversion into validators and
/// post-load transforms.
///
/// Cloning is cheap: the entries are shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: Arc<BTreeMap<String, Value>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a context with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.entries).insert(key.into(), value.into());
        self
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(Value::Int(5).compare(&Value::Float(5.5)), Some(Ordering::Less));
        assert_eq!(Value::Float(10.0).compare(&Value::Int(10)), Some(Ordering::Equal));
        assert_eq!(Value::Int(1).compare(&Value::from("1")), None);
    }

    #[test]
    fn test_len_counts_characters() {
        assert_eq!(Value::from("héllo").len(), Some(5));
        assert_eq!(Value::List(vec![Value::Null, Value::Null]).len(), Some(2));
        assert_eq!(Value::Int(3).len(), None);
    }

    #[test]
    fn test_get_from_map_and_object() {
        let map = Value::Map(vec![(Value::from("foo"), Value::Int(1))]);
        assert_eq!(map.get("foo"), Some(&Value::Int(1)));

        let object = Value::Object(BTreeMap::from([("bar".to_string(), Value::Bool(true))]));
        assert_eq!(object.get("bar"), Some(&Value::Bool(true)));
        assert!(object.get("baz").is_none());
    }

    #[test]
    fn test_serialize_to_json() {
        let value = Value::Object(BTreeMap::from([
            ("age".to_string(), Value::Null),
            (
                "tags".to_string(),
                Value::List(vec![Value::from("a"), Value::from("b")]),
            ),
            (
                "scores".to_string(),
                Value::Map(vec![(Value::from("x"), Value::Float(1.5))]),
            ),
        ]));

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "age": null,
                "tags": ["a", "b"],
                "scores": { "x": 1.5 }
            })
        );
    }

    #[test]
    fn test_context_is_shared_on_clone() {
        let context = Context::new().with("locale", "en");
        let copy = context.clone().with("strict", true);

        assert_eq!(context.get("locale"), Some(&Value::from("en")));
        assert!(context.get("strict").is_none());
        assert_eq!(copy.get("strict"), Some(&Value::Bool(true)));
    }
}
