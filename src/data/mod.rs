//! Cell and column types for loaded tables.
//!

use serde::{Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;

use crate::traits::IntoDatumType;

/// The scalar type declared for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Integer,
}

impl ColumnType {
    /// Coerce a raw field into a [`DatumType`] of this column type.
    ///
    /// An empty field is missing data, and becomes [`DatumType::NoValue`],
    /// except in a `required` integer column, where it is a parse error.
    pub fn coerce(&self, raw: &str, required: bool) -> Result<DatumType, ParseIntError> {
        match self {
            ColumnType::String if raw.is_empty() => Ok(DatumType::NoValue),
            ColumnType::String => Ok(DatumType::String(raw.to_string())),
            ColumnType::Integer if raw.is_empty() && !required => Ok(DatumType::NoValue),
            ColumnType::Integer => raw.trim().parse::<i64>().map(DatumType::Integer),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Integer => write!(f, "int"),
        }
    }
}

/// A single table cell: a value of its column's declared type, or
/// [`DatumType::NoValue`] when the field was absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatumType {
    String(String),
    Integer(i64),
    NoValue,
}

impl DatumType {
    pub fn is_missing(&self) -> bool {
        matches!(self, DatumType::NoValue)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DatumType::String(val) => Some(val),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            DatumType::Integer(val) => Some(*val),
            _ => None,
        }
    }
}

impl fmt::Display for DatumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatumType::String(val) => write!(f, "{}", val),
            DatumType::Integer(val) => write!(f, "{}", val),
            DatumType::NoValue => Ok(()),
        }
    }
}

// Missing cells serialize as `None`, which the csv writer emits as an empty field.
impl Serialize for DatumType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DatumType::String(val) => serializer.serialize_str(val),
            DatumType::Integer(val) => serializer.serialize_i64(*val),
            DatumType::NoValue => serializer.serialize_none(),
        }
    }
}

impl IntoDatumType for i64 {
    fn into_data_type(self) -> DatumType {
        DatumType::Integer(self)
    }
}

impl IntoDatumType for String {
    fn into_data_type(self) -> DatumType {
        DatumType::String(self)
    }
}

impl IntoDatumType for &str {
    fn into_data_type(self) -> DatumType {
        DatumType::String(self.to_string())
    }
}

impl<T: IntoDatumType> IntoDatumType for Option<T> {
    fn into_data_type(self) -> DatumType {
        self.map_or(DatumType::NoValue, |x| x.into_data_type())
    }
}

// Conversion from field types to `DatumType`
impl<T: IntoDatumType> From<T> for DatumType {
    fn from(item: T) -> Self {
        item.into_data_type()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnType, DatumType};

    #[test]
    fn test_coerce_string_passthrough() {
        let datum = ColumnType::String.coerce("76M", true).unwrap();
        assert_eq!(datum, DatumType::String("76M".to_string()));
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(
            ColumnType::Integer.coerce("-120", true).unwrap(),
            DatumType::Integer(-120)
        );
        assert!(ColumnType::Integer.coerce("12a", false).is_err());
    }

    #[test]
    fn test_coerce_empty_is_missing() {
        assert!(ColumnType::Integer.coerce("", false).unwrap().is_missing());
        assert!(ColumnType::String.coerce("", false).unwrap().is_missing());
        assert!(ColumnType::String.coerce("", true).unwrap().is_missing());
    }

    #[test]
    fn test_coerce_empty_required_integer() {
        assert!(ColumnType::Integer.coerce("", true).is_err());
        assert!(ColumnType::Integer.coerce(" ", true).is_err());
    }

    #[test]
    fn test_datum_conversions() {
        assert_eq!(DatumType::from(5i64).as_integer(), Some(5));
        assert_eq!(DatumType::from("chr1").as_str(), Some("chr1"));
        assert_eq!(DatumType::from(None::<i64>), DatumType::NoValue);
        assert_eq!(DatumType::NoValue.to_string(), "");
    }
}
