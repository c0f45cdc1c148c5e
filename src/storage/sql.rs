use crate::error::StorageError;

/// Reject anything that is not a plain SQL Server identifier.
///
/// The name is spliced into the statement unquoted, so it has to be safe as-is.
pub(crate) fn validate_database_name(name: &str) -> Result<(), StorageError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '@' || c == '#');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '$'));
    if valid_start && valid_rest && name.chars().count() <= 128 {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// `CREATE DATABASE <name>` with an optional collation clause.
#[must_use]
pub fn create_database_sql(database: &str, lc_collate: Option<&str>) -> String {
    match lc_collate {
        Some(collation) => format!(
            "CREATE DATABASE {database} COLLATE='{}'",
            collation.replace('\'', "''")
        ),
        None => format!("CREATE DATABASE {database}"),
    }
}

#[must_use]
pub fn drop_database_sql(database: &str) -> String {
    format!("DROP DATABASE {database}")
}
