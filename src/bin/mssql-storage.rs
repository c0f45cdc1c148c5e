use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mssql_adapter::{AdapterConfig, StorageError, StorageManager};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Create or drop a SQL Server database")]
struct Args {
    #[arg(value_enum)]
    command: Command,
    /// JSON adapter config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    user: Option<String>,
    #[arg(long, env = "MSSQL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    database: Option<String>,
    #[arg(long)]
    collation: Option<String>,
}

fn load_config(args: &Args) -> Result<AdapterConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            AdapterConfig::from_json(&text).map_err(|e| e.to_string())?
        }
        None => AdapterConfig::default(),
    };

    let conn = &mut config.connection;
    if let Some(host) = &args.host {
        conn.hostname = Some(host.clone());
    }
    if args.port.is_some() {
        conn.port = args.port;
    }
    if let Some(user) = &args.user {
        conn.username.clone_from(user);
    }
    if let Some(password) = &args.password {
        conn.password.clone_from(password);
    }
    if let Some(database) = &args.database {
        conn.database = Some(database.clone());
    }
    if let Some(collation) = &args.collation {
        config.storage.lc_collate = Some(collation.clone());
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(msg) => {
            error!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let storage = StorageManager::new();
    let outcome = match args.command {
        Command::Up => storage.storage_up(&config).await,
        Command::Down => storage.storage_down(&config).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ (StorageError::AlreadyExists { .. } | StorageError::AlreadyAbsent { .. })) => {
            info!("{e}; nothing to do");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
