// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod store;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use store::ConfigStore;
pub use types::{
    Config, DatabaseConfig, HttpConfig, LoggingConfig, PerformanceConfig, RouteEntry,
    RoutesConfig, ServerConfig,
};

impl Config {
    /// Load the typed configuration out of a store
    /// Missing keys fall back to the built-in defaults
    pub fn load_from(store: &ConfigStore) -> Result<Self, config::ConfigError> {
        store.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load(toml: &str) -> Config {
        let settings = store::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        Config::load_from(&ConfigStore::from_settings(settings)).unwrap()
    }

    #[test]
    fn test_defaults_deserialize() {
        let cfg = load("");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.dsn, "wordlog.db");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.routes.extra.is_empty());
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_extra_routes() {
        let cfg = load(
            r#"
            [[routes.extra]]
            method = "post"
            selector = "word/add"
            handler = "words@save"

            [[routes.extra]]
            selector = "health"
            handler = "ping@pong"
            "#,
        );
        assert_eq!(cfg.routes.extra.len(), 2);
        assert_eq!(cfg.routes.extra[0].method, "post");
        assert_eq!(cfg.routes.extra[1].method, "GET");
        assert_eq!(cfg.routes.extra[1].handler, "ping@pong");
    }

    #[test]
    fn test_invalid_host() {
        let cfg = load("[server]\nhost = \"not a host\"\n");
        assert!(cfg.get_socket_addr().is_err());
    }
}
