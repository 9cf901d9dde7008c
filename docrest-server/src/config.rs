use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which document store backend the server connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// A MongoDB deployment reached through `mongodb_url`
    Mongodb,
    /// Process-local storage, lost on restart
    Memory,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// MongoDB connection string
    #[serde(default = "default_mongodb_url")]
    pub mongodb_url: String,

    /// Database holding the entity collections
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Host or address to bind to
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Port to bind to
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Human-readable logs instead of JSON lines
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default = "default_app_description")]
    pub app_description: String,

    /// Storage backend
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackendKind,

    /// Log filter directive, e.g. `info` or `docrest=debug,tower_http=info`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable permissive CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// How long MongoDB operations wait for a reachable server
    #[serde(default = "default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongodb_url: default_mongodb_url(),
            database_name: default_database_name(),
            api_host: default_api_host(),
            api_port: default_api_port(),
            debug: false,
            app_name: default_app_name(),
            app_version: default_app_version(),
            app_description: default_app_description(),
            store_backend: default_store_backend(),
            log_level: default_log_level(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            server_selection_timeout_ms: default_server_selection_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a `.env` file, an optional `docrest` config file, and
    /// environment variables, in increasing order of precedence.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is not an error
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("docrest").required(false))
            .add_source(config::Environment::default())
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize from an already assembled set of configuration sources
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        Ok(config.try_deserialize()?)
    }

    /// Address to bind the listener to, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }
}

fn default_mongodb_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "padelug_db".to_string()
}

fn default_api_host() -> String {
    "localhost".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_app_name() -> String {
    "PadelUG API".to_string()
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_app_description() -> String {
    "A REST API for PadelUG backed by a document store".to_string()
}

fn default_store_backend() -> StoreBackendKind {
    StoreBackendKind::Mongodb
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_server_selection_timeout_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.mongodb_url, "mongodb://localhost:27017");
        assert_eq!(cfg.database_name, "padelug_db");
        assert_eq!(cfg.api_port, 8000);
        assert_eq!(cfg.store_backend, StoreBackendKind::Mongodb);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.server_selection_timeout(), Duration::from_millis(5000));
        assert!(cfg.enable_cors);
        assert!(!cfg.debug);
    }

    #[test]
    fn test_empty_sources_fall_back_to_defaults() {
        let config = config::Config::builder().build().unwrap();
        let cfg = AppConfig::from_config(config).unwrap();
        assert_eq!(cfg.bind_addr(), "localhost:8000");
        assert_eq!(cfg.app_name, "PadelUG API");
    }

    #[test]
    fn test_string_sources_are_parsed() {
        let config = config::Config::builder()
            .set_override("api_port", "9001")
            .unwrap()
            .set_override("debug", "true")
            .unwrap()
            .set_override("store_backend", "memory")
            .unwrap()
            .set_override("database_name", "scratch")
            .unwrap()
            .build()
            .unwrap();

        let cfg = AppConfig::from_config(config).unwrap();
        assert_eq!(cfg.api_port, 9001);
        assert!(cfg.debug);
        assert_eq!(cfg.store_backend, StoreBackendKind::Memory);
        assert_eq!(cfg.database_name, "scratch");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let config = config::Config::builder()
            .set_override("store_backend", "sqlite")
            .unwrap()
            .build()
            .unwrap();

        assert!(AppConfig::from_config(config).is_err());
    }
}
