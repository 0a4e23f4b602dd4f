//! Name-indexed access to entity records.
//!
//! Tables and forms are generic over the entity they display. They never see
//! concrete struct fields; instead they read and write scalars through the
//! [`Record`] trait using the accessor names that appear in field and column
//! descriptors. `#[derive(shaya_derive::Record)]` implements the trait for any
//! struct with named fields whose types implement [`ToFieldValue`] and
//! [`FromFieldValue`].

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value held by one field of an entity record.
///
/// Values order as `Null < Number < Text`; numbers compare numerically and
/// text compares lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The field has no value.
    Null,
    /// An integral value such as an identifier.
    Number(i64),
    /// A textual value.
    Text(String),
}

impl FieldValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    /// Returns true for `Null` and for empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(_) => false,
            Self::Text(s) => s.is_empty(),
        }
    }

    /// Interprets the value as an identifier.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Self::Null => None,
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Errors raised when reading or writing a record by accessor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The accessor does not name a field of the record.
    UnknownField(String),
    /// The value cannot be stored in the named field.
    InvalidValue {
        /// The accessor that rejected the value.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(field) => write!(f, "Unknown field '{}'", field),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// Converts a field into a [`FieldValue`].
pub trait ToFieldValue {
    /// Returns the scalar held by this field.
    fn to_field_value(&self) -> FieldValue;
}

/// Builds a field from a [`FieldValue`].
pub trait FromFieldValue: Sized {
    /// Converts `value`, describing the problem when it does not fit.
    fn from_field_value(value: FieldValue) -> Result<Self, String>;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        Ok(match value {
            FieldValue::Null => String::new(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s,
        })
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Number(*self)
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        match value {
            FieldValue::Number(n) => Ok(n),
            FieldValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("'{}' is not a number", s)),
            FieldValue::Null => Err("a number is required".to_string()),
        }
    }
}

/// `None` reads as `Null`; `Null` and empty text write as `None`.
impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(inner) => inner.to_field_value(),
            None => FieldValue::Null,
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: FieldValue) -> Result<Self, String> {
        if value.is_blank() {
            Ok(None)
        } else {
            T::from_field_value(value).map(Some)
        }
    }
}

/// An entity record whose fields are addressable by accessor name.
///
/// Implement with `#[derive(shaya_derive::Record)]`.
pub trait Record {
    /// The accessor names of every field, in declaration order.
    fn field_names() -> &'static [&'static str];

    /// Reads the field named `accessor`, or `None` if there is no such field.
    fn get(&self, accessor: &str) -> Option<FieldValue>;

    /// Writes the field named `accessor`.
    fn set(&mut self, accessor: &str, value: FieldValue) -> Result<(), RecordError>;

    /// Returns true if `accessor` names a field of this record type.
    fn has_field(accessor: &str) -> bool {
        Self::field_names().contains(&accessor)
    }
}
