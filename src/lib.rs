//! SQL Server adapter layer for data-mapping frameworks.
//!
//! Storage provisioning over one-shot administrative connections, DDL execution on a
//! `bb8` pool of `tiberius` clients, and coercion of wire values (0/1 booleans, JSON
//! text columns) into the types the data layer expects.

pub mod adapter;
pub mod config;
pub mod ddl;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod mssql;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod storage;
pub mod types;

pub use adapter::MssqlAdapter;
pub use config::{AdapterConfig, ConnectionOptions, PoolOptions, SslOptions, StorageOptions};
pub use error::{AdapterError, ConnectionError, LoadError, QueryError, StorageError};
pub use gateway::{AdminExecutor, CommandOutput, StorageCommandResult, TiberiusAdmin, connect};
pub use storage::StorageManager;
pub use types::{CanonicalValue, LogicalType, RowValues};
