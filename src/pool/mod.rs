use async_trait::async_trait;
use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use tracing::debug;

use crate::config::AdapterConfig;
use crate::error::{ConnectionError, QueryError};
use crate::mssql::{build_result_set, build_tiberius_config};
use crate::results::ResultSet;
use crate::types::RowValues;

/// Pooled SQL Server connections.
pub type MssqlPool = Pool<ConnectionManager>;

/// Per-call options for the pooled path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Emit the statement text at `debug` level.
    pub log: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { log: true }
    }
}

/// The pooled execution path: check out a connection, run one statement, return it.
///
/// Checkout blocking, sizing and recycling belong to the implementation.
#[async_trait]
pub trait PooledExecutor: Send + Sync {
    /// Execute `sql` with positional `params`.
    ///
    /// # Errors
    ///
    /// Returns the checkout or execution failure unchanged.
    async fn execute(
        &self,
        sql: &str,
        params: &[RowValues],
        options: &ExecuteOptions,
    ) -> Result<ResultSet, QueryError>;
}

#[async_trait]
impl PooledExecutor for MssqlPool {
    async fn execute(
        &self,
        sql: &str,
        params: &[RowValues],
        options: &ExecuteOptions,
    ) -> Result<ResultSet, QueryError> {
        if options.log {
            debug!(sql, params = params.len(), "executing on pool");
        }
        let mut conn = self.get().await?;
        build_result_set(&mut conn, sql, params).await
    }
}

/// Configuration and connection pool for a repository.
#[derive(Clone)]
pub struct ConfigAndPool {
    /// The connection pool
    pub pool: MssqlPool,
    /// The configuration the pool was built from
    pub config: AdapterConfig,
}

// bb8_tiberius::ConnectionManager doesn't implement Debug
impl std::fmt::Debug for ConfigAndPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigAndPool")
            .field("pool", &"<MssqlPool>")
            .field("config", &self.config)
            .finish()
    }
}

impl ConfigAndPool {
    /// Build the pool described by `config`.
    ///
    /// Lazy pools open no connection here; eager pools fill `size` idle connections
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Pool` if no database is configured or an eager pool
    /// cannot open its connections.
    pub async fn new_mssql(config: AdapterConfig) -> Result<Self, ConnectionError> {
        // only administrative connections fall back to master
        if config
            .connection
            .database
            .as_deref()
            .is_none_or(str::is_empty)
        {
            return Err(ConnectionError::Pool("no database configured".to_string()));
        }
        let tiberius_config = build_tiberius_config(&config.connection);
        let manager = ConnectionManager::new(tiberius_config);

        let builder = Pool::builder()
            .max_size(config.pool.max_size())
            .min_idle(config.pool.min_idle());

        let pool = if config.pool.lazy {
            builder.build_unchecked(manager)
        } else {
            builder
                .build(manager)
                .await
                .map_err(|e| ConnectionError::Pool(e.to_string()))?
        };

        debug!(
            max_size = config.pool.max_size(),
            lazy = config.pool.lazy,
            "SQL Server pool ready"
        );
        Ok(ConfigAndPool { pool, config })
    }
}
