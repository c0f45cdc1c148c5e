use crate::config::AdapterConfig;
use crate::ddl::{self, DdlRenderer, DialectContext};
use crate::error::{ConnectionError, LoadError, QueryError, StorageError};
use crate::gateway::{AdminExecutor, TiberiusAdmin};
use crate::loader::{JsonCodec, SerdeJsonCodec, TypeLoader};
use crate::pool::{ConfigAndPool, ExecuteOptions, MssqlPool, PooledExecutor};
use crate::results::CustomDbRow;
use crate::storage::{MessageClassifier, OutcomeClassifier, StorageManager};
use crate::types::{CanonicalValue, LogicalType, RowValues};

/// The hooks a data-mapping framework calls on a SQL Server repository.
///
/// Every collaborator is a type parameter so tests can swap in fakes; the defaults
/// talk to a real server.
pub struct MssqlAdapter<
    P = MssqlPool,
    A = TiberiusAdmin,
    C = MessageClassifier,
    J = SerdeJsonCodec,
> {
    config: AdapterConfig,
    pool: P,
    storage: StorageManager<A, C>,
    loader: TypeLoader<J>,
    dialect: DialectContext,
}

impl MssqlAdapter {
    /// Build the pool for `config` and wire up the default collaborators.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Pool` if the pool cannot be created.
    pub async fn connect(config: AdapterConfig) -> Result<Self, ConnectionError> {
        let ConfigAndPool { pool, config } = ConfigAndPool::new_mssql(config).await?;
        Ok(Self::from_parts(
            config,
            pool,
            StorageManager::new(),
            TypeLoader::new(),
        ))
    }
}

impl<P, A, C, J> MssqlAdapter<P, A, C, J>
where
    P: PooledExecutor,
    A: AdminExecutor,
    C: OutcomeClassifier,
    J: JsonCodec,
{
    #[must_use]
    pub fn from_parts(
        config: AdapterConfig,
        pool: P,
        storage: StorageManager<A, C>,
        loader: TypeLoader<J>,
    ) -> Self {
        let dialect = DialectContext {
            filter_null_on_unique_indexes: config.filter_null_on_unique_indexes,
            ..DialectContext::default()
        };
        Self {
            config,
            pool,
            storage,
            loader,
            dialect,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    #[must_use]
    pub fn pool(&self) -> &P {
        &self.pool
    }

    #[must_use]
    pub fn dialect(&self) -> &DialectContext {
        &self.dialect
    }

    /// Create the repository's database.
    ///
    /// # Errors
    ///
    /// See [`StorageManager::storage_up`].
    pub async fn storage_up(&self) -> Result<(), StorageError> {
        self.storage.storage_up(&self.config).await
    }

    /// Drop the repository's database.
    ///
    /// # Errors
    ///
    /// See [`StorageManager::storage_down`].
    pub async fn storage_down(&self) -> Result<(), StorageError> {
        self.storage.storage_down(&self.config).await
    }

    /// Render and run one schema change on the pool.
    ///
    /// # Errors
    ///
    /// Returns the execution failure unchanged.
    pub async fn execute_ddl<R, D>(
        &self,
        renderer: &R,
        definition: &D,
        options: &ExecuteOptions,
    ) -> Result<(), QueryError>
    where
        R: DdlRenderer<D> + ?Sized,
        D: ?Sized,
    {
        ddl::execute_ddl(&self.pool, renderer, &self.dialect, definition, options).await
    }

    /// # Errors
    ///
    /// Returns `LoadError` if the value cannot be represented as `logical_type`.
    pub fn load(
        &self,
        logical_type: LogicalType,
        value: &RowValues,
    ) -> Result<CanonicalValue, LoadError> {
        self.loader.load(logical_type, value)
    }

    /// # Errors
    ///
    /// Returns the first column that fails to load.
    pub fn load_row(
        &self,
        types: &[LogicalType],
        row: &CustomDbRow,
    ) -> Result<Vec<CanonicalValue>, LoadError> {
        self.loader.load_row(types, row)
    }

    #[must_use]
    pub fn supports_ddl_transaction(&self) -> bool {
        ddl::supports_ddl_transaction()
    }
}
