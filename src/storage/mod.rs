// Storage provisioning: CREATE/DROP DATABASE over an administrative connection.
// - sql: statement rendering and name validation
// - classify: turning command results into outcomes

pub mod classify;
pub mod sql;

use tracing::{debug, info, warn};

use crate::config::AdapterConfig;
use crate::error::StorageError;
use crate::gateway::{AdminExecutor, TiberiusAdmin};

pub use classify::{MessageClassifier, OutcomeClassifier};
pub use sql::{create_database_sql, drop_database_sql};

/// Creates and drops databases.
///
/// Each call opens its own connection to `master` through the `AdminExecutor`,
/// runs one statement and hands the result to the `OutcomeClassifier`.
#[derive(Debug, Clone, Default)]
pub struct StorageManager<A = TiberiusAdmin, C = MessageClassifier> {
    admin: A,
    classifier: C,
}

impl StorageManager {
    /// Manager using real connections and the default message rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: AdminExecutor, C: OutcomeClassifier> StorageManager<A, C> {
    #[must_use]
    pub fn with_parts(admin: A, classifier: C) -> Self {
        Self { admin, classifier }
    }

    #[must_use]
    pub fn admin(&self) -> &A {
        &self.admin
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Create the configured database.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if it is already there; `Generic` for any other failure;
    /// `Connection` if `master` could not be reached.
    pub async fn storage_up(&self, config: &AdapterConfig) -> Result<(), StorageError> {
        let database = target_database(config)?;
        log_ignored_storage_options(config);

        let sql = create_database_sql(database, config.storage.lc_collate.as_deref());
        debug!(%sql, "storage up");
        let result = self.admin.run(&config.connection.for_admin(), &sql).await?;

        let outcome = self.classifier.classify_create(database, result);
        if outcome.is_ok() {
            info!(database, "database created");
        }
        outcome
    }

    /// Drop the configured database.
    ///
    /// # Errors
    ///
    /// `AlreadyAbsent` if there is nothing to drop; `Generic` for any other failure;
    /// `Connection` if `master` could not be reached.
    pub async fn storage_down(&self, config: &AdapterConfig) -> Result<(), StorageError> {
        let database = target_database(config)?;

        let sql = drop_database_sql(database);
        debug!(%sql, "storage down");
        let result = self.admin.run(&config.connection.for_admin(), &sql).await?;

        let outcome = self.classifier.classify_drop(database, result);
        if outcome.is_ok() {
            info!(database, "database dropped");
        }
        outcome
    }
}

fn target_database(config: &AdapterConfig) -> Result<&str, StorageError> {
    let database = config
        .connection
        .database
        .as_deref()
        .ok_or(StorageError::MissingDatabase)?;
    sql::validate_database_name(database)?;
    Ok(database)
}

fn log_ignored_storage_options(config: &AdapterConfig) {
    let storage = &config.storage;
    for (name, value) in [
        ("encoding", &storage.encoding),
        ("template", &storage.template),
        ("lc_ctype", &storage.lc_ctype),
    ] {
        if value.is_some() {
            warn!(option = name, "storage option has no SQL Server equivalent; ignored");
        }
    }
}
