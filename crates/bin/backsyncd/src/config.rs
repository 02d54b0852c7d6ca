//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `backsync.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use backsync_app::services::crud_service::UpdateIdSource;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Resources to mount under `/api`.
    pub resources: Vec<ResourceConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// One resource to mount.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    /// Collection name in the URL (`/api/{collection}`).
    pub collection: String,
    /// Backing table; defaults to the collection name.
    #[serde(default)]
    pub table: Option<String>,
    /// Where PUT identifiers come from.
    #[serde(default)]
    pub update_id: UpdateIdConfig,
}

impl ResourceConfig {
    /// Name of the backing table.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.collection)
    }
}

/// Identifier policy selector for PUT requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateIdConfig {
    /// Identifier comes from the path parameter.
    #[default]
    Path,
    /// Identifier comes from the `id` key of the JSON payload.
    Payload,
}

impl From<UpdateIdConfig> for UpdateIdSource {
    fn from(value: UpdateIdConfig) -> Self {
        match value {
            UpdateIdConfig::Path => Self::PathParam,
            UpdateIdConfig::Payload => Self::Payload,
        }
    }
}

impl Config {
    /// Load configuration from `backsync.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("backsync.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BACKSYNC_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("BACKSYNC_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("BACKSYNC_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("BACKSYNC_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("BACKSYNC_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.resources.is_empty() {
            return Err(ConfigError::Validation(
                "at least one resource must be configured".to_string(),
            ));
        }
        for resource in &self.resources {
            if resource.collection.is_empty() || resource.collection.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "invalid collection name: {:?}",
                    resource.collection
                )));
            }
        }
        for (index, resource) in self.resources.iter().enumerate() {
            if self.resources[..index]
                .iter()
                .any(|other| other.collection == resource.collection)
            {
                return Err(ConfigError::Validation(format!(
                    "duplicate collection: {}",
                    resource.collection
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            resources: vec![
                ResourceConfig {
                    collection: "tasks".to_string(),
                    table: None,
                    update_id: UpdateIdConfig::Path,
                },
                ResourceConfig {
                    collection: "notes".to_string(),
                    table: None,
                    update_id: UpdateIdConfig::Payload,
                },
            ],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:backsync.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "backsyncd=info,backsync=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:backsync.db?mode=rwc");
        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.resources[0].collection, "tasks");
        assert_eq!(config.resources[0].update_id, UpdateIdConfig::Path);
        assert_eq!(config.resources[1].collection, "notes");
        assert_eq!(config.resources[1].update_id, UpdateIdConfig::Payload);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.resources.len(), 2);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [[resources]]
            collection = 'plants'
            table = 'plant_rows'
            update_id = 'payload'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.resources.len(), 1);
        assert_eq!(config.resources[0].collection, "plants");
        assert_eq!(config.resources[0].table(), "plant_rows");
        assert_eq!(config.resources[0].update_id, UpdateIdConfig::Payload);
    }

    #[test]
    fn should_default_table_to_collection_name() {
        let toml = "
            [[resources]]
            collection = 'plants'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.resources[0].table(), "plants");
        assert_eq!(config.resources[0].update_id, UpdateIdConfig::Path);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_resource_list() {
        let config: Config = toml::from_str("resources = []").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_duplicate_collections() {
        let toml = "
            [[resources]]
            collection = 'tasks'

            [[resources]]
            collection = 'tasks'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_collection_names_with_slashes() {
        let toml = "
            [[resources]]
            collection = 'a/b'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_default_configuration() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 8080
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite:backsync.db?mode=rwc");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_update_id_policy() {
        let toml = "
            [[resources]]
            collection = 'tasks'
            update_id = 'header'
        ";
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
