use std::fmt;

use serde::Deserialize;

use crate::error::AdapterError;

/// Environment variable consulted when no hostname is configured.
pub const HOSTNAME_ENV: &str = "MSSQLHOST";
pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1433;
/// Database administrative connections attach to.
pub const ADMIN_DATABASE: &str = "master";

/// TLS settings passed through to the protocol client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SslOptions {
    /// Accept any server certificate.
    pub trust_server_certificate: bool,
    /// CA certificate used to validate the server instead of the system store.
    pub ca_file: Option<String>,
}

/// Options for reaching a SQL Server instance.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub instance_name: Option<String>,
    /// Auxiliary key/value pairs handed to the protocol client.
    pub parameters: Vec<(String, String)>,
    pub ssl: bool,
    pub ssl_opts: SslOptions,
}

// Keep the password out of logs.
impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("instance_name", &self.instance_name)
            .field("parameters", &self.parameters)
            .field("ssl", &self.ssl)
            .field("ssl_opts", &self.ssl_opts)
            .finish_non_exhaustive()
    }
}

impl ConnectionOptions {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn with_instance_name(mut self, instance_name: Option<String>) -> Self {
        self.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_ssl(mut self, ssl: bool, ssl_opts: SslOptions) -> Self {
        self.ssl = ssl;
        self.ssl_opts = ssl_opts;
        self
    }

    /// Configured hostname, else `MSSQLHOST`, else `localhost`.
    #[must_use]
    pub fn resolved_hostname(&self) -> String {
        self.hostname_or(std::env::var(HOSTNAME_ENV).ok())
    }

    /// Hostname resolution with the environment lookup supplied by the caller.
    #[must_use]
    pub fn hostname_or(&self, env_default: Option<String>) -> String {
        self.hostname
            .clone()
            .filter(|h| !h.is_empty())
            .or(env_default.filter(|h| !h.is_empty()))
            .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string())
    }

    #[must_use]
    pub fn resolved_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Configured database, or `master` when none is set.
    #[must_use]
    pub fn resolved_database(&self) -> &str {
        self.database.as_deref().unwrap_or(ADMIN_DATABASE)
    }

    /// Copy of these options pointed at `master`.
    ///
    /// Storage commands must not connect to the database they create or drop.
    #[must_use]
    pub fn for_admin(&self) -> Self {
        Self {
            database: Some(ADMIN_DATABASE.to_string()),
            ..self.clone()
        }
    }
}

/// Pool sizing handed to `bb8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolOptions {
    pub size: u32,
    pub max_overflow: u32,
    /// Open connections on first use instead of at pool construction.
    pub lazy: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            size: 10,
            max_overflow: 0,
            lazy: true,
        }
    }
}

impl PoolOptions {
    /// Upper bound on open connections.
    #[must_use]
    pub fn max_size(&self) -> u32 {
        self.size.saturating_add(self.max_overflow).max(1)
    }

    /// Idle connections kept warm. Lazy pools keep none.
    #[must_use]
    pub fn min_idle(&self) -> Option<u32> {
        if self.lazy { None } else { Some(self.size) }
    }
}

/// Options that only matter when creating a database.
///
/// SQL Server only renders `lc_collate`; the others are accepted so shared
/// configuration does not have to be filtered per adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    pub encoding: Option<String>,
    pub template: Option<String>,
    pub lc_collate: Option<String>,
    pub lc_ctype: Option<String>,
}

/// Everything a repository hands to the adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub connection: ConnectionOptions,
    pub pool: PoolOptions,
    pub storage: StorageOptions,
    /// Read by the query planner, carried here so one config feeds both.
    pub filter_null_on_unique_indexes: bool,
}

impl AdapterConfig {
    #[must_use]
    pub fn new(connection: ConnectionOptions) -> Self {
        Self {
            connection,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_collation(mut self, lc_collate: impl Into<String>) -> Self {
        self.storage.lc_collate = Some(lc_collate.into());
        self
    }

    #[must_use]
    pub fn with_pool(mut self, pool: PoolOptions) -> Self {
        self.pool = pool;
        self
    }

    /// Parse a JSON document into a config. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::ConfigError` if the document does not parse.
    pub fn from_json(text: &str) -> Result<Self, AdapterError> {
        serde_json::from_str(text)
            .map_err(|e| AdapterError::ConfigError(format!("invalid adapter config: {e}")))
    }
}
