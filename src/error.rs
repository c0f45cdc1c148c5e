use thiserror::Error;

use bb8_tiberius::Error as Bb8TiberiusError;

/// Failure to open an administrative connection.
///
/// Returned as-is from the gateway: nothing in this crate retries a connect.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to resolve server address {address}: {message}")]
    Resolve { address: String, message: String },

    #[error("TCP connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] tiberius::error::Error),

    #[error("Failed to create SQL Server pool: {0}")]
    Pool(String),
}

/// Outcome of a storage-level command that did not succeed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// `CREATE DATABASE` found the database already present.
    #[error("database {database} already exists")]
    AlreadyExists { database: String },

    /// `DROP DATABASE` found nothing to drop.
    #[error("database {database} does not exist")]
    AlreadyAbsent { database: String },

    /// Any other non-zero status. `output` is the server text as reported.
    #[error("storage command failed: {output}")]
    Generic { output: String },

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("no database configured for storage command")]
    MissingDatabase,

    #[error("invalid database name: {0}")]
    InvalidName(String),
}

impl StorageError {
    /// True for the conditions provisioning tooling treats as a no-op.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self,
            StorageError::AlreadyExists { .. } | StorageError::AlreadyAbsent { .. }
        )
    }
}

/// Failure on the pooled execution path.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Mssql(#[from] tiberius::error::Error),

    #[error(transparent)]
    Pool(#[from] bb8::RunError<Bb8TiberiusError>),

    #[error("SQL execution error: {0}")]
    Execution(String),
}

/// Failure to coerce a wire value into its logical type.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAMap(String),

    #[error("cannot load {value} as {logical_type}")]
    Mismatch { logical_type: String, value: String },
}

/// Umbrella error for callers that drive several hooks from one place.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
