use std::sync::Mutex;

use async_trait::async_trait;
use mssql_adapter::prelude::*;

/// Pool stand-in: records statements, optionally fails them.
#[derive(Default)]
struct RecordingPool {
    fail_with: Option<String>,
    executed: Mutex<Vec<(String, usize)>>,
}

impl RecordingPool {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            executed: Mutex::default(),
        }
    }

    fn executed(&self) -> Vec<(String, usize)> {
        self.executed.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PooledExecutor for RecordingPool {
    async fn execute(
        &self,
        sql: &str,
        params: &[RowValues],
        _options: &ExecuteOptions,
    ) -> Result<ResultSet, QueryError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push((sql.to_string(), params.len()));
        }
        match &self.fail_with {
            Some(message) => Err(QueryError::Execution(message.clone())),
            None => Ok(ResultSet::default()),
        }
    }
}

/// Schema changes as a host framework might describe them.
enum Migration {
    CreateTable { name: String, columns: Vec<(String, String)> },
    DropTable { name: String },
}

struct MigrationRenderer;

impl DdlRenderer<Migration> for MigrationRenderer {
    fn render_ddl(&self, definition: &Migration, dialect: &DialectContext) -> String {
        match definition {
            Migration::CreateTable { name, columns } => {
                let cols: Vec<String> = columns
                    .iter()
                    .map(|(col, ty)| format!("{} {ty}", dialect.quote_ident(col)))
                    .collect();
                format!("CREATE TABLE {} ({})", dialect.quote_ident(name), cols.join(", "))
            }
            Migration::DropTable { name } => format!("DROP TABLE {}", dialect.quote_ident(name)),
        }
    }
}

fn adapter_with(pool: RecordingPool) -> MssqlAdapter<RecordingPool> {
    MssqlAdapter::from_parts(
        AdapterConfig::default(),
        pool,
        StorageManager::new(),
        TypeLoader::new(),
    )
}

#[tokio::test]
async fn one_statement_no_params() -> Result<(), QueryError> {
    let adapter = adapter_with(RecordingPool::default());
    let create = Migration::CreateTable {
        name: "users".into(),
        columns: vec![("id".into(), "BIGINT".into()), ("active".into(), "BIT".into())],
    };

    adapter
        .execute_ddl(&MigrationRenderer, &create, &ExecuteOptions::default())
        .await?;

    assert_eq!(
        adapter.pool().executed(),
        vec![("CREATE TABLE [users] ([id] BIGINT, [active] BIT)".to_string(), 0)]
    );
    assert!(adapter.supports_ddl_transaction());
    Ok(())
}

#[tokio::test]
async fn execution_failures_propagate_unchanged() {
    let adapter = adapter_with(RecordingPool::failing(
        "There is already an object named 'users' in the database.",
    ));
    let drop = Migration::DropTable {
        name: "users".into(),
    };

    let err = adapter
        .execute_ddl(&MigrationRenderer, &drop, &ExecuteOptions::default())
        .await;
    match err {
        Err(QueryError::Execution(msg)) => assert!(msg.contains("already an object named")),
        other => panic!("expected execution error, got {other:?}"),
    }
    assert_eq!(adapter.pool().executed().len(), 1);
}

#[tokio::test]
async fn closure_renderers_and_free_function() -> Result<(), QueryError> {
    let pool = RecordingPool::default();
    let render = |table: &str, d: &DialectContext| format!("TRUNCATE TABLE {}", d.quote_ident(table));

    execute_ddl(
        &pool,
        &render,
        &DialectContext::default(),
        "events",
        &ExecuteOptions { log: false },
    )
    .await?;

    assert_eq!(pool.executed(), vec![("TRUNCATE TABLE [events]".to_string(), 0)]);
    Ok(())
}

#[tokio::test]
async fn dialect_carries_repository_flag() {
    let config = AdapterConfig {
        filter_null_on_unique_indexes: true,
        ..AdapterConfig::default()
    };
    let adapter: MssqlAdapter<RecordingPool> = MssqlAdapter::from_parts(
        config,
        RecordingPool::default(),
        StorageManager::new(),
        TypeLoader::new(),
    );
    assert!(adapter.dialect().filter_null_on_unique_indexes);
    assert_eq!(adapter.dialect().name, "mssql");
}
