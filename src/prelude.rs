//! Convenient imports for common functionality.

pub use crate::adapter::MssqlAdapter;
pub use crate::config::{AdapterConfig, ConnectionOptions, PoolOptions, SslOptions, StorageOptions};
pub use crate::ddl::{DdlRenderer, DialectContext, execute_ddl, supports_ddl_transaction};
pub use crate::error::{AdapterError, ConnectionError, LoadError, QueryError, StorageError};
pub use crate::gateway::{AdminExecutor, CommandOutput, StorageCommandResult, TiberiusAdmin};
pub use crate::loader::{
    DefaultLoader, JsonCodec, LoadedValue, SerdeJsonCodec, StandardLoader, TypeLoader,
};
pub use crate::pool::{ConfigAndPool, ExecuteOptions, MssqlPool, PooledExecutor};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::storage::{MessageClassifier, OutcomeClassifier, StorageManager};
pub use crate::types::{CanonicalValue, LogicalType, RowValues};
