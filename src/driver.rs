//! The boundary between date types and a database-access layer.
//!
//! A driver hands column values to application types as a [DriverValue], and takes parameters
//! back the same way. Types that can be read from a column implement [Scan]; types that can be
//! bound as a parameter implement [ToDriverValue].

use crate::error::DateError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// A loosely-typed value moving between a query result (or parameter) and an application type.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverValue {
    /// SQL `NULL`.
    Null,
    /// An integer column.
    Integer(i64),
    /// A floating point column.
    Real(f64),
    /// A text column.
    Text(String),
    /// A binary column.
    Blob(Vec<u8>),
    /// A boolean column.
    Boolean(bool),
    /// A date, datetime or timestamp column, with the offset it was read in.
    Timestamp(DateTime<FixedOffset>),
}

impl DriverValue {
    /// A short name for the kind of value held, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            DriverValue::Null => "null",
            DriverValue::Integer(_) => "integer",
            DriverValue::Real(_) => "real",
            DriverValue::Text(_) => "text",
            DriverValue::Blob(_) => "blob",
            DriverValue::Boolean(_) => "boolean",
            DriverValue::Timestamp(_) => "timestamp",
        }
    }

    /// Whether this is SQL `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, DriverValue::Null)
    }
}

impl From<i32> for DriverValue {
    fn from(v: i32) -> Self {
        DriverValue::Integer(v.into())
    }
}

impl From<i64> for DriverValue {
    fn from(v: i64) -> Self {
        DriverValue::Integer(v)
    }
}

impl From<f64> for DriverValue {
    fn from(v: f64) -> Self {
        DriverValue::Real(v)
    }
}

impl From<String> for DriverValue {
    fn from(v: String) -> Self {
        DriverValue::Text(v)
    }
}

impl From<&str> for DriverValue {
    fn from(v: &str) -> Self {
        DriverValue::Text(v.to_string())
    }
}

impl From<bool> for DriverValue {
    fn from(v: bool) -> Self {
        DriverValue::Boolean(v)
    }
}

impl From<Vec<u8>> for DriverValue {
    fn from(v: Vec<u8>) -> Self {
        DriverValue::Blob(v)
    }
}

impl From<DateTime<FixedOffset>> for DriverValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        DriverValue::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for DriverValue {
    fn from(v: DateTime<Utc>) -> Self {
        DriverValue::Timestamp(v.fixed_offset())
    }
}

/// Timestamps without an offset are taken to be in UTC.
impl From<NaiveDateTime> for DriverValue {
    fn from(v: NaiveDateTime) -> Self {
        DriverValue::Timestamp(v.and_utc().fixed_offset())
    }
}

impl<T: Into<DriverValue>> From<Option<T>> for DriverValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => DriverValue::Null,
        }
    }
}

/// Reads a column value into an existing instance, replacing whatever it held before.
pub trait Scan {
    /// Converts `value` into `self`, or returns [DateError::TypeMismatch] if `value` is of a type
    /// this instance cannot hold.
    fn scan(&mut self, value: &DriverValue) -> Result<(), DateError>;
}

/// Produces the value bound for a query parameter.
pub trait ToDriverValue {
    /// Returns the driver value representing `self`.
    fn to_driver_value(&self) -> DriverValue;
}
