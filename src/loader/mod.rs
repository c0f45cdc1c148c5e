// Wire value coercion.
// - codec: pluggable JSON decoding for map/embedded columns
// - default: the standard loader everything else falls through to

pub mod codec;
pub mod default;

use serde_json::Value as JsonValue;

use crate::error::LoadError;
use crate::results::CustomDbRow;
use crate::types::{CanonicalValue, LogicalType, RowValues};

pub use codec::{JsonCodec, SerdeJsonCodec};
pub use default::{DefaultLoader, StandardLoader};

/// Result of the SQL Server specific dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedValue {
    /// The adapter decoded the value itself.
    Decoded(CanonicalValue),
    /// Not a case the adapter handles; use the default loader.
    Passthrough,
}

/// Loads column values, handling the encodings SQL Server forces on us:
/// booleans as 0/1 integers and maps/embedded documents as JSON text.
#[derive(Debug, Clone, Default)]
pub struct TypeLoader<C = SerdeJsonCodec, F = StandardLoader> {
    codec: C,
    fallback: F,
}

impl TypeLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: JsonCodec> TypeLoader<C, StandardLoader> {
    #[must_use]
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            fallback: StandardLoader,
        }
    }
}

impl<C: JsonCodec, F: DefaultLoader> TypeLoader<C, F> {
    #[must_use]
    pub fn with_parts(codec: C, fallback: F) -> Self {
        Self { codec, fallback }
    }

    /// The adapter-specific cases only.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if JSON text fails to decode or is not an object.
    pub fn try_load(
        &self,
        logical_type: LogicalType,
        value: &RowValues,
    ) -> Result<LoadedValue, LoadError> {
        let loaded = match (logical_type, value) {
            (LogicalType::Embedded | LogicalType::Map, RowValues::Text(text)) => {
                let decoded: JsonValue = self.codec.decode(text)?;
                // decoded documents load as plain maps
                self.fallback
                    .load(LogicalType::Map, &RowValues::JSON(decoded))?
            }
            (LogicalType::Boolean, RowValues::Int(0)) => CanonicalValue::Bool(false),
            (LogicalType::Boolean, RowValues::Int(1)) => CanonicalValue::Bool(true),
            _ => return Ok(LoadedValue::Passthrough),
        };
        Ok(LoadedValue::Decoded(loaded))
    }

    /// Load one column value.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the value cannot be represented as `logical_type`.
    pub fn load(
        &self,
        logical_type: LogicalType,
        value: &RowValues,
    ) -> Result<CanonicalValue, LoadError> {
        match self.try_load(logical_type, value)? {
            LoadedValue::Decoded(loaded) => Ok(loaded),
            LoadedValue::Passthrough => self.fallback.load(logical_type, value),
        }
    }

    /// Load every column of `row`. Columns beyond `types` load as `Any`.
    ///
    /// # Errors
    ///
    /// Returns the first column that fails to load.
    pub fn load_row(
        &self,
        types: &[LogicalType],
        row: &CustomDbRow,
    ) -> Result<Vec<CanonicalValue>, LoadError> {
        row.rows
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let ty = types.get(idx).copied().unwrap_or(LogicalType::Any);
                self.load(ty, value)
            })
            .collect()
    }
}
