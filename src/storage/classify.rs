use crate::error::StorageError;
use crate::gateway::StorageCommandResult;

/// Maps the result of a storage command to the caller-facing outcome.
///
/// Implementations decide which failures are idempotent. Swap one in to match
/// another server's wording or to key on error numbers instead of text.
pub trait OutcomeClassifier: Send + Sync {
    /// Classify the result of `CREATE DATABASE`.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` for the idempotent case, `Generic` otherwise.
    fn classify_create(
        &self,
        database: &str,
        result: StorageCommandResult,
    ) -> Result<(), StorageError>;

    /// Classify the result of `DROP DATABASE`.
    ///
    /// # Errors
    ///
    /// `AlreadyAbsent` for the idempotent case, `Generic` otherwise.
    fn classify_drop(&self, database: &str, result: StorageCommandResult)
    -> Result<(), StorageError>;
}

/// Substring matching on the server message.
///
/// SQL Server reports these conditions as free text (errors 1801 and 3701), so
/// the message is what gets matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageClassifier {
    pub already_exists: String,
    pub does_not_exist: String,
}

impl Default for MessageClassifier {
    fn default() -> Self {
        Self {
            already_exists: "already exists".to_string(),
            does_not_exist: "does not exist".to_string(),
        }
    }
}

impl MessageClassifier {
    #[must_use]
    pub fn new(already_exists: impl Into<String>, does_not_exist: impl Into<String>) -> Self {
        Self {
            already_exists: already_exists.into(),
            does_not_exist: does_not_exist.into(),
        }
    }
}

impl OutcomeClassifier for MessageClassifier {
    fn classify_create(
        &self,
        database: &str,
        result: StorageCommandResult,
    ) -> Result<(), StorageError> {
        if result.is_success() {
            return Ok(());
        }
        if mentions(&result, &self.already_exists) {
            return Err(StorageError::AlreadyExists {
                database: database.to_string(),
            });
        }
        Err(generic(result))
    }

    fn classify_drop(
        &self,
        database: &str,
        result: StorageCommandResult,
    ) -> Result<(), StorageError> {
        if result.is_success() {
            return Ok(());
        }
        if mentions(&result, &self.does_not_exist) {
            return Err(StorageError::AlreadyAbsent {
                database: database.to_string(),
            });
        }
        // also covers a failure with no output at all
        Err(generic(result))
    }
}

fn mentions(result: &StorageCommandResult, needle: &str) -> bool {
    result.message().is_some_and(|message| message.contains(needle))
}

fn generic(result: StorageCommandResult) -> StorageError {
    let output = match result.output {
        Some(out) => match out.code {
            Some(code) => format!("{} (error {code}, status {})", out.message, result.status),
            None => format!("{} (status {})", out.message, result.status),
        },
        None => format!("no output (status {})", result.status),
    };
    StorageError::Generic { output }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXISTS: &str = "Database 'app_test' already exists. Choose a different database name.";
    const MISSING: &str = "Cannot drop the database 'app_test', because it does not exist or you do not have permission.";

    #[test]
    fn create_outcomes() {
        let c = MessageClassifier::default();
        assert!(c.classify_create("app_test", StorageCommandResult::success()).is_ok());
        assert!(matches!(
            c.classify_create("app_test", StorageCommandResult::failed(EXISTS, Some(1801))),
            Err(StorageError::AlreadyExists { database }) if database == "app_test"
        ));
        assert!(matches!(
            c.classify_create("app_test", StorageCommandResult::failed("Login failed", Some(18456))),
            Err(StorageError::Generic { output }) if output.contains("Login failed")
        ));
    }

    #[test]
    fn drop_outcomes() {
        let c = MessageClassifier::default();
        assert!(c.classify_drop("app_test", StorageCommandResult::success()).is_ok());
        assert!(matches!(
            c.classify_drop("app_test", StorageCommandResult::failed(MISSING, Some(3701))),
            Err(StorageError::AlreadyAbsent { .. })
        ));
        // "already exists" means nothing to a drop
        assert!(matches!(
            c.classify_drop("app_test", StorageCommandResult::failed(EXISTS, None)),
            Err(StorageError::Generic { .. })
        ));
    }

    #[test]
    fn drop_failure_without_output_is_generic() {
        let c = MessageClassifier::default();
        let result = StorageCommandResult {
            output: None,
            status: 2,
        };
        assert!(matches!(
            c.classify_drop("app_test", result),
            Err(StorageError::Generic { output }) if output.contains("status 2")
        ));
    }

    #[test]
    fn custom_wording() {
        let c = MessageClassifier::new("existiert bereits", "existiert nicht");
        assert!(matches!(
            c.classify_create("db", StorageCommandResult::failed("db existiert bereits", None)),
            Err(StorageError::AlreadyExists { .. })
        ));
        assert!(matches!(
            c.classify_create("db", StorageCommandResult::failed(EXISTS, None)),
            Err(StorageError::Generic { .. })
        ));
    }
}
