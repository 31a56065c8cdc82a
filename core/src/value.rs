//! Scalar values and ordered records exchanged with the stores.
//!
//! Rows coming back from a relational store and data maps supplied by
//! callers are both expressed as [`Record`]s: insertion-ordered maps from
//! key to [`Value`]. A key that is absent from a record means "no value
//! supplied" (leave unchanged / use the store default), while an explicit
//! [`Value::Null`] means SQL `NULL`. The two are deliberately distinct.
//!
//! Raw store rows only ever contain `Null`, `Integer`, `Real`, and `Text`;
//! the temporal variants are produced by the engine's decode step when a
//! field's semantic type calls for them.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Textual format for [`Value::Date`] (`2024-01-31`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Textual format for [`Value::DateTime`] (`2024-01-31 13:45:00`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Textual format for [`Value::Time`] (`13:45:00`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// An insertion-ordered map from key to value.
///
/// Used both for raw rows (keyed by physical column name) and for entity
/// data (keyed by field code). Iteration order is insertion order, which
/// carries the field-declaration-order contract of the engine.
pub type Record = IndexMap<String, Value>;

/// A scalar value supplied to or produced by a relational store.
///
/// # Examples
///
/// ```
/// use data_domain_core::Value;
///
/// let v = Value::from("Douglas");
/// assert_eq!(v.to_string(), "Douglas");
/// assert!(!v.is_null());
/// assert!(Value::Null.is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Calendar date, serialized as [`DATE_FORMAT`] text.
    Date(NaiveDate),
    /// Date and time of day, serialized as [`DATETIME_FORMAT`] text.
    DateTime(NaiveDateTime),
    /// Time of day, serialized as [`TIME_FORMAT`] text.
    Time(NaiveTime),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Real(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Real(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => {
                serializer.serialize_str(&dt.format(DATETIME_FORMAT).to_string())
            }
            Value::Time(t) => serializer.serialize_str(&t.format(TIME_FORMAT).to_string()),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, a number, or a string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Integer(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        i64::try_from(n)
            .map(Value::Integer)
            .map_err(|_| E::custom(format!("integer out of range: {n}")))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Real(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::Text(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Text("abc".into()).to_string(), "abc");
        let d = NaiveDate::from_ymd_opt(1767, 7, 11).unwrap();
        assert_eq!(Value::Date(d).to_string(), "1767-07-11");
    }

    #[test]
    fn test_option_conversion_maps_none_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Integer(7));
    }

    #[test]
    fn test_serialize_to_json_scalars() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Integer(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&Value::Text("x".into())).unwrap(),
            "\"x\""
        );
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            serde_json::to_string(&Value::Date(d)).unwrap(),
            "\"2024-01-31\""
        );
    }

    #[test]
    fn test_deserialize_from_json_scalars() {
        let v: Value = serde_json::from_str("null").unwrap();
        assert_eq!(v, Value::Null);
        let v: Value = serde_json::from_str("12").unwrap();
        assert_eq!(v, Value::Integer(12));
        let v: Value = serde_json::from_str("1.5").unwrap();
        assert_eq!(v, Value::Real(1.5));
        let v: Value = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(v, Value::Text("hi".into()));
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("b".to_string(), Value::Integer(1));
        record.insert("a".to_string(), Value::Integer(2));
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
