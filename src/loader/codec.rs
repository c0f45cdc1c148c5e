use serde_json::Value as JsonValue;

use crate::error::LoadError;

/// Decodes JSON text stored in map and embedded-document columns.
pub trait JsonCodec: Send + Sync {
    /// # Errors
    ///
    /// Returns `LoadError::Json` if `text` is not valid JSON.
    fn decode(&self, text: &str) -> Result<JsonValue, LoadError>;
}

/// The default codec, `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn decode(&self, text: &str) -> Result<JsonValue, LoadError> {
        Ok(serde_json::from_str(text)?)
    }
}
