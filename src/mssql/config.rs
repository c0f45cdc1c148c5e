use tiberius::{AuthMethod, Config as TiberiusConfig, EncryptionLevel};
use tracing::warn;

use crate::config::ConnectionOptions;

/// Type alias for SQL Server client
pub type MssqlClient = bb8_tiberius::rt::Client;

/// Translate connection options into a driver config, applying defaults.
pub fn build_tiberius_config(opts: &ConnectionOptions) -> TiberiusConfig {
    let mut config = TiberiusConfig::new();
    config.host(opts.resolved_hostname());
    config.port(opts.resolved_port());
    config.database(opts.resolved_database());
    config.authentication(AuthMethod::sql_server(&opts.username, &opts.password));
    if let Some(instance) = &opts.instance_name {
        config.instance_name(instance);
    }

    let (encryption, trust) = tls_settings(opts);
    config.encryption(encryption);
    match trust {
        Trust::CaFile(path) => config.trust_cert_ca(path),
        Trust::Any => config.trust_cert(),
        Trust::SystemStore => {}
    }

    apply_parameters(&mut config, &opts.parameters);
    config
}

/// How the server certificate is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Trust {
    CaFile(String),
    Any,
    SystemStore,
}

/// `ssl` picks the encryption level; `ca_file` wins over `trust_server_certificate`.
/// Unencrypted connections still trust any certificate for the login handshake.
pub(crate) fn tls_settings(opts: &ConnectionOptions) -> (EncryptionLevel, Trust) {
    let level = if opts.ssl {
        EncryptionLevel::Required
    } else {
        EncryptionLevel::NotSupported
    };
    let trust = match &opts.ssl_opts.ca_file {
        Some(ca_file) => Trust::CaFile(ca_file.clone()),
        None if !opts.ssl || opts.ssl_opts.trust_server_certificate => Trust::Any,
        None => Trust::SystemStore,
    };
    (level, trust)
}

/// Connection parameters the driver understands, after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParameterSettings {
    pub application_name: Option<String>,
    pub readonly: Option<bool>,
    pub ignored: Vec<String>,
}

pub(crate) fn parse_parameters(parameters: &[(String, String)]) -> ParameterSettings {
    let mut settings = ParameterSettings::default();
    for (key, value) in parameters {
        match key.to_ascii_lowercase().as_str() {
            "application_name" | "app" => settings.application_name = Some(value.clone()),
            "readonly" => settings.readonly = Some(is_truthy(value)),
            "applicationintent" => settings.readonly = Some(value.eq_ignore_ascii_case("readonly")),
            _ => settings.ignored.push(key.clone()),
        }
    }
    settings
}

fn apply_parameters(config: &mut TiberiusConfig, parameters: &[(String, String)]) {
    let settings = parse_parameters(parameters);
    if let Some(name) = &settings.application_name {
        config.application_name(name);
    }
    if let Some(readonly) = settings.readonly {
        config.readonly(readonly);
    }
    for key in &settings.ignored {
        warn!(parameter = %key, "ignoring unrecognized connection parameter");
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
