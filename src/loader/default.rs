use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::LoadError;
use crate::types::{CanonicalValue, LogicalType, RowValues};

/// Loader for every (type, value) pair the adapter does not special-case.
pub trait DefaultLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns `LoadError` if `value` cannot represent `logical_type`.
    fn load(&self, logical_type: LogicalType, value: &RowValues)
    -> Result<CanonicalValue, LoadError>;
}

/// Standard coercion: NULL stays NULL, integers widen to floats, text and
/// binary pass through, JSON objects become maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLoader;

impl DefaultLoader for StandardLoader {
    fn load(
        &self,
        logical_type: LogicalType,
        value: &RowValues,
    ) -> Result<CanonicalValue, LoadError> {
        let loaded = match (logical_type, value) {
            (_, RowValues::Null) => CanonicalValue::Null,
            (LogicalType::Any, raw) => any_value(raw),
            (LogicalType::Boolean, RowValues::Bool(b)) => CanonicalValue::Bool(*b),
            (LogicalType::Integer, RowValues::Int(i)) => CanonicalValue::Int(*i),
            (LogicalType::Float, RowValues::Float(f)) => CanonicalValue::Float(*f),
            #[allow(clippy::cast_precision_loss)]
            (LogicalType::Float, RowValues::Int(i)) => CanonicalValue::Float(*i as f64),
            (LogicalType::String, RowValues::Text(s)) => CanonicalValue::Text(s.clone()),
            (LogicalType::Binary, RowValues::Blob(b)) => CanonicalValue::Binary(b.clone()),
            (LogicalType::Map | LogicalType::Embedded, RowValues::JSON(json)) => {
                map_value(json)?
            }
            (LogicalType::NaiveDateTime, RowValues::Timestamp(ts)) => CanonicalValue::Timestamp(*ts),
            (LogicalType::NaiveDateTime, RowValues::Text(s)) => {
                parse_timestamp(s).ok_or_else(|| mismatch(logical_type, value))?
            }
            _ => return Err(mismatch(logical_type, value)),
        };
        Ok(loaded)
    }
}

fn mismatch(logical_type: LogicalType, value: &RowValues) -> LoadError {
    LoadError::Mismatch {
        logical_type: logical_type.to_string(),
        value: value.kind().to_string(),
    }
}

fn map_value(json: &JsonValue) -> Result<CanonicalValue, LoadError> {
    match json {
        JsonValue::Object(map) => Ok(CanonicalValue::Map(map.clone())),
        other => Err(LoadError::NotAMap(json_kind(other).to_string())),
    }
}

fn any_value(raw: &RowValues) -> CanonicalValue {
    match raw {
        RowValues::Int(i) => CanonicalValue::Int(*i),
        RowValues::Float(f) => CanonicalValue::Float(*f),
        RowValues::Text(s) => CanonicalValue::Text(s.clone()),
        RowValues::Bool(b) => CanonicalValue::Bool(*b),
        RowValues::Timestamp(ts) => CanonicalValue::Timestamp(*ts),
        RowValues::Null => CanonicalValue::Null,
        RowValues::Blob(b) => CanonicalValue::Binary(b.clone()),
        RowValues::JSON(json) => match json {
            JsonValue::Null => CanonicalValue::Null,
            JsonValue::Bool(b) => CanonicalValue::Bool(*b),
            JsonValue::Number(n) => n
                .as_i64()
                .map(CanonicalValue::Int)
                .or_else(|| n.as_f64().map(CanonicalValue::Float))
                .unwrap_or_else(|| CanonicalValue::Text(n.to_string())),
            JsonValue::String(s) => CanonicalValue::Text(s.clone()),
            JsonValue::Object(map) => CanonicalValue::Map(map.clone()),
            JsonValue::Array(_) => CanonicalValue::Text(json.to_string()),
        },
    }
}

fn parse_timestamp(s: &str) -> Option<CanonicalValue> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(CanonicalValue::Timestamp)
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
