//! Cell values moved by the row helpers.

use duckdb::types::{ToSql, ToSqlOutput, Value, ValueRef};
use std::fmt;

/// A single cell value read from or written to a table.
///
/// Values are always bound as statement parameters, never spliced into SQL.
/// Column types without a native variant (timestamps, decimals, dates) are
/// read as their text rendering and written back as text, which DuckDB casts
/// on insert.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl RowValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RowValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<Value> for RowValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RowValue::Null,
            Value::Boolean(b) => RowValue::Boolean(b),
            Value::TinyInt(i) => RowValue::Integer(i64::from(i)),
            Value::SmallInt(i) => RowValue::Integer(i64::from(i)),
            Value::Int(i) => RowValue::Integer(i64::from(i)),
            Value::BigInt(i) => RowValue::Integer(i),
            Value::UTinyInt(i) => RowValue::Integer(i64::from(i)),
            Value::USmallInt(i) => RowValue::Integer(i64::from(i)),
            Value::UInt(i) => RowValue::Integer(i64::from(i)),
            Value::UBigInt(i) => match i64::try_from(i) {
                Ok(v) => RowValue::Integer(v),
                Err(_) => RowValue::Text(i.to_string()),
            },
            Value::HugeInt(i) => match i64::try_from(i) {
                Ok(v) => RowValue::Integer(v),
                Err(_) => RowValue::Text(i.to_string()),
            },
            Value::Float(f) => RowValue::Real(f64::from(f)),
            Value::Double(f) => RowValue::Real(f),
            Value::Text(s) => RowValue::Text(s),
            other => RowValue::Text(format!("{other:?}")),
        }
    }
}

impl ToSql for RowValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            RowValue::Null => ToSqlOutput::Owned(Value::Null),
            RowValue::Boolean(b) => ToSqlOutput::Owned(Value::Boolean(*b)),
            RowValue::Integer(i) => ToSqlOutput::Owned(Value::BigInt(*i)),
            RowValue::Real(f) => ToSqlOutput::Owned(Value::Double(*f)),
            RowValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValue::Null => f.write_str("null"),
            RowValue::Boolean(b) => write!(f, "{b}"),
            RowValue::Integer(i) => write!(f, "{i}"),
            RowValue::Real(r) => write!(f, "{r}"),
            RowValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowValue {
    fn from(v: i64) -> Self {
        RowValue::Integer(v)
    }
}

impl From<i32> for RowValue {
    fn from(v: i32) -> Self {
        RowValue::Integer(i64::from(v))
    }
}

impl From<f64> for RowValue {
    fn from(v: f64) -> Self {
        RowValue::Real(v)
    }
}

impl From<bool> for RowValue {
    fn from(v: bool) -> Self {
        RowValue::Boolean(v)
    }
}

impl From<&str> for RowValue {
    fn from(v: &str) -> Self {
        RowValue::Text(v.to_string())
    }
}

impl From<String> for RowValue {
    fn from(v: String) -> Self {
        RowValue::Text(v)
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RowValue::Null, Into::into)
    }
}

/// Whether a catalog data type reads back as a native [`RowValue`] variant.
///
/// Everything else is selected through `CAST(... AS VARCHAR)`.
pub(crate) fn is_native_type(data_type: &str) -> bool {
    const NATIVE: &[&str] = &[
        "BOOLEAN",
        "TINYINT",
        "SMALLINT",
        "INTEGER",
        "BIGINT",
        "HUGEINT",
        "UTINYINT",
        "USMALLINT",
        "UINTEGER",
        "UBIGINT",
        "FLOAT",
        "REAL",
        "DOUBLE",
        "VARCHAR",
        "TEXT",
    ];
    let upper = data_type.trim().to_ascii_uppercase();
    NATIVE.contains(&upper.as_str())
}
