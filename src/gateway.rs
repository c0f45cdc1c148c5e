//! One-shot administrative connections.
//!
//! Storage commands such as `CREATE DATABASE` cannot run on the pooled connection:
//! the pool is bound to the database being created. The gateway opens a private
//! connection, runs one statement and drops it. Nothing here is pooled or retried.

use std::net::ToSocketAddrs;

use async_trait::async_trait;
use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;

use crate::config::ConnectionOptions;
use crate::error::ConnectionError;
use crate::mssql::{MssqlClient, build_tiberius_config};

/// Open a single connection described by `options`.
///
/// `hostname` falls back to `MSSQLHOST` then `localhost`; `database` falls back to
/// `master`. Named instances are located through the SQL Browser service.
///
/// # Errors
///
/// Returns the resolution, I/O or protocol failure as-is.
pub async fn connect(options: &ConnectionOptions) -> Result<MssqlClient, ConnectionError> {
    let config = build_tiberius_config(options);
    let host = options.resolved_hostname();
    let port = options.resolved_port();
    debug!(
        %host,
        port,
        database = options.resolved_database(),
        user = %options.username,
        "opening administrative connection"
    );

    let tcp = if options.instance_name.is_some() {
        TcpStream::connect_named(&config).await?
    } else {
        let server_addr = (host.as_str(), port)
            .to_socket_addrs()
            .map_err(|e| ConnectionError::Resolve {
                address: format!("{host}:{port}"),
                message: e.to_string(),
            })?
            .next()
            .ok_or_else(|| ConnectionError::Resolve {
                address: format!("{host}:{port}"),
                message: "no address found".to_string(),
            })?;
        TcpStream::connect(server_addr).await?
    };
    tcp.set_nodelay(true)?;

    Ok(Client::connect(config, tcp.compat_write()).await?)
}

/// Server-reported detail attached to a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Human-readable server message.
    pub message: String,
    /// Server error number, when the failure came from the server.
    pub code: Option<u32>,
}

/// What an administrative command produced: status `0` is success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCommandResult {
    pub output: Option<CommandOutput>,
    pub status: i32,
}

impl StorageCommandResult {
    #[must_use]
    pub fn success() -> Self {
        Self {
            output: None,
            status: 0,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>, code: Option<u32>) -> Self {
        Self {
            output: Some(CommandOutput {
                message: message.into(),
                code,
            }),
            status: 1,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Message text, if the command left any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.message.as_str())
    }
}

/// Runs a single statement outside the pool.
#[async_trait]
pub trait AdminExecutor: Send + Sync {
    /// Run `sql` on a fresh connection built from `options`.
    ///
    /// Statement failures are reported in the returned result, not as `Err`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the connection cannot be opened.
    async fn run(
        &self,
        options: &ConnectionOptions,
        sql: &str,
    ) -> Result<StorageCommandResult, ConnectionError>;
}

/// `AdminExecutor` backed by a real tiberius connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiberiusAdmin;

#[async_trait]
impl AdminExecutor for TiberiusAdmin {
    async fn run(
        &self,
        options: &ConnectionOptions,
        sql: &str,
    ) -> Result<StorageCommandResult, ConnectionError> {
        let mut client = connect(options).await?;
        let result = match client.execute(sql, &[]).await {
            Ok(_) => StorageCommandResult::success(),
            Err(err) => command_failure(&err),
        };
        if let Err(e) = client.close().await {
            debug!(error = %e, "closing administrative connection failed");
        }
        Ok(result)
    }
}

fn command_failure(err: &tiberius::error::Error) -> StorageCommandResult {
    match err {
        tiberius::error::Error::Server(token) => {
            StorageCommandResult::failed(token.message(), Some(token.code()))
        }
        other => StorageCommandResult::failed(other.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_server_errors_carry_message_without_code() {
        let err = tiberius::error::Error::Protocol("unexpected token".into());
        let result = command_failure(&err);
        assert!(!result.is_success());
        assert_eq!(result.output.as_ref().and_then(|o| o.code), None);
        assert!(result.message().is_some_and(|m| m.contains("unexpected token")));
    }

    #[test]
    fn success_has_no_output() {
        let ok = StorageCommandResult::success();
        assert!(ok.is_success());
        assert_eq!(ok.message(), None);
    }
}
