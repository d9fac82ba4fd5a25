use crate::collection::RecordId;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Compare two floats with proper NaN and total ordering.
/// NaN is treated as greater than all other values.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Represents a [crate::collection::Document] field value.
///
/// Provides a unified representation for everything that can be stored in a
/// record: scalars (booleans, integers, floats, text), ordered arrays, and
/// store-assigned record identifiers. Absence of a value is [Value::Null].
///
/// Integer and float values compare numerically across variants, so a query
/// for `25` matches a stored `25.0`. Values form a total order (used for
/// sorted query results and unique-index keys): `Null` sorts before
/// everything, then booleans, numbers, text, arrays, and record identifiers.
///
/// Values are normally created through `From` conversions or the `doc!`
/// macro:
/// ```text
/// let v1: Value = 42.into();
/// let v2 = Value::from("hello");
/// let doc = doc! { name: "Alice", age: 42 };
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents an ordered array of values.
    Array(Vec<Value>),
    /// Represents a store-assigned record identifier.
    Id(RecordId),
}

impl Value {
    /// Checks whether this value is [Value::Null].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks whether this value is a record identifier.
    #[inline]
    pub fn is_id(&self) -> bool {
        matches!(self, Value::Id(_))
    }

    /// Checks whether this value is numeric (integer or float).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    /// Returns the boolean value, if this is a [Value::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a [Value::I64].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the numeric value widened to `f64`, if this value is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a [Value::String].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array elements, if this is a [Value::Array].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the record identifier, if this is a [Value::Id].
    pub fn as_id(&self) -> Option<RecordId> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }

    // rank used to order values of different types
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I64(_) | Value::F64(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Id(_) => 5,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.type_rank().cmp(&other.type_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            // numeric values compare across integer/float variants
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                num_cmp_float(a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN))
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Id(a), Value::Id(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(values) => {
                write!(f, "[{}]", values.iter().map(|v| v.to_string()).join(", "))
            }
            Value::Id(id) => write!(f, "{}", id),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::I64(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<RecordId> for Value {
    fn from(value: RecordId) -> Self {
        Value::Id(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_variants() {
        assert_eq!(Value::I64(25), Value::F64(25.0));
        assert_ne!(Value::I64(25), Value::F64(25.5));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
    }

    #[test]
    fn test_null_sorts_before_everything() {
        assert!(Value::Null < Value::Bool(false));
        assert!(Value::Null < Value::I64(i64::MIN));
        assert!(Value::Null < Value::String(String::new()));
    }

    #[test]
    fn test_string_ordering() {
        assert!(Value::from("Jane Dickson") < Value::from("Jane Smith"));
        assert!(Value::from("Jane Smith") < Value::from("John Doe"));
    }

    #[test]
    fn test_array_ordering_is_lexicographic() {
        let a = Value::from(vec!["Pizza", "Burger"]);
        let b = Value::from(vec!["Pizza", "Sushi"]);
        assert!(a < b);
    }

    #[test]
    fn test_as_accessors() {
        assert_eq!(Value::from(42).as_i64(), Some(42));
        assert_eq!(Value::from(42).as_f64(), Some(42.0));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::Null.as_i64().is_none());

        let id = RecordId::new();
        assert_eq!(Value::from(id).as_id(), Some(id));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some(27)), Value::I64(27));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(27).to_string(), "27");
        assert_eq!(Value::from("Ibrahim").to_string(), "\"Ibrahim\"");
        assert_eq!(
            Value::from(vec!["Pizza", "Burger"]).to_string(),
            "[\"Pizza\", \"Burger\"]"
        );
    }
}
