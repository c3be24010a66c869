use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub collection: CollectionSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub events: String,
    pub registrations: String,
    pub users: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Advisory length of a round, shown to operators; rotation stays
    /// operator-triggered regardless.
    #[serde(default = "default_round_duration_secs")]
    pub round_duration_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            round_duration_secs: default_round_duration_secs(),
        }
    }
}

fn default_round_duration_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with CAROUSEL_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with CAROUSEL_)
            // e.g., CAROUSEL_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CAROUSEL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CAROUSEL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply store credential overrides from plain environment variables,
/// so deployments can keep secrets out of config files
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let store_endpoint = env::var("CAROUSEL_STORE__ENDPOINT").ok();
    let store_api_key = env::var("CAROUSEL_STORE__API_KEY").ok();
    let store_project_id = env::var("CAROUSEL_STORE__PROJECT_ID").ok();
    let store_database_id = env::var("CAROUSEL_STORE__DATABASE_ID").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(endpoint) = store_endpoint {
        builder = builder.set_override("store.endpoint", endpoint)?;
    }
    if let Some(api_key) = store_api_key {
        builder = builder.set_override("store.api_key", api_key)?;
    }
    if let Some(project_id) = store_project_id {
        builder = builder.set_override("store.project_id", project_id)?;
    }
    if let Some(database_id) = store_database_id {
        builder = builder.set_override("store.database_id", database_id)?;
    }

    builder.build()
}
