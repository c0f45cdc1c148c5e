use std::fmt;

use chrono::NaiveDateTime;
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Values as they come off the wire, or as they are bound as query parameters.
///
/// A `BIT` column arrives as `Bool`, but once cast or computed it comes back as an
/// `Int` of 0/1:
/// ```rust
/// use mssql_adapter::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Short name of the variant, used in load diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "int",
            RowValues::Float(_) => "float",
            RowValues::Text(_) => "text",
            RowValues::Bool(_) => "bool",
            RowValues::Timestamp(_) => "timestamp",
            RowValues::Null => "null",
            RowValues::JSON(_) => "json",
            RowValues::Blob(_) => "blob",
        }
    }
}

/// Logical column types the data layer asks values to be loaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Boolean,
    Integer,
    Float,
    String,
    Binary,
    /// Free-form mapping, stored as JSON text.
    Map,
    /// Embedded document, stored as JSON text and materialized as a map.
    Embedded,
    NaiveDateTime,
    /// Accept whatever the wire produced.
    Any,
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Boolean => "boolean",
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::String => "string",
            LogicalType::Binary => "binary",
            LogicalType::Map => "map",
            LogicalType::Embedded => "embedded",
            LogicalType::NaiveDateTime => "naive_datetime",
            LogicalType::Any => "any",
        };
        f.write_str(name)
    }
}

/// A column value after coercion, in the shape the data layer consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),
    Timestamp(NaiveDateTime),
    Map(JsonMap<String, JsonValue>),
}

impl CanonicalValue {
    #[must_use]
    pub fn as_map(&self) -> Option<&JsonMap<String, JsonValue>> {
        if let CanonicalValue::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }
}
