//! Key/value configuration store
//!
//! Wraps the merged `config::Config` map. The underlying sources (file,
//! environment, defaults) are read once, on first access, and never again.

use serde::de::DeserializeOwned;
use std::sync::OnceLock;

use crate::logger;

/// Environment variable prefix, e.g. `WORDLOG_DATABASE__DSN`
const ENV_PREFIX: &str = "WORDLOG";

/// Lazily loaded, read-only configuration map
pub struct ConfigStore {
    /// Config file path without extension
    path: String,
    settings: OnceLock<config::Config>,
}

impl ConfigStore {
    /// Create a store that reads `path` (and the environment) on first use
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            settings: OnceLock::new(),
        }
    }

    /// Create a store around an already built settings map
    pub fn from_settings(settings: config::Config) -> Self {
        Self {
            path: String::new(),
            settings: OnceLock::from(settings),
        }
    }

    /// Merged settings, loading them on first call
    pub fn settings(&self) -> &config::Config {
        self.settings.get_or_init(|| {
            build(&self.path).unwrap_or_else(|e| {
                logger::log_error(&format!(
                    "Failed to load configuration '{}': {e}, using defaults",
                    self.path
                ));
                defaults()
                    .and_then(|builder| builder.build())
                    .unwrap_or_default()
            })
        })
    }

    /// Look up `name` (dotted path), falling back to `default` when the key
    /// is missing or has the wrong type
    pub fn get<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        self.settings().get::<T>(name).unwrap_or(default)
    }

    /// Deserialize the whole map into a typed structure
    pub fn try_deserialize<T: DeserializeOwned>(&self) -> Result<T, config::ConfigError> {
        self.settings().clone().try_deserialize()
    }

    /// Build eagerly so load errors reach the caller instead of the log
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        Ok(Self::from_settings(build(path)?))
    }
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

/// Built-in defaults for every key the typed config requires
pub fn defaults() -> Result<Builder, config::ConfigError> {
    config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "wordlog/0.1")?
        .set_default("http.enable_cors", false)?
        .set_default("http.max_body_size", 1_048_576)? // 1MB
        .set_default("database.dsn", "wordlog.db")?
        .set_default("database.busy_timeout_ms", 5000)?
        .set_default("database.read_only", false)?
        .set_default("database.init_schema", true)
}

fn build(path: &str) -> Result<config::Config, config::ConfigError> {
    defaults()?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
}
