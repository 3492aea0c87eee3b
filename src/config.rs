//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::macros::MacroContext;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub datasource: DatasourceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GridDB web API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatasourceConfig {
    /// Web API servers, tried in rotation
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,

    #[serde(default)]
    pub cluster: String,

    #[serde(default = "default_database")]
    pub database: String,

    /// Lower bound for `$__interval`
    #[serde(default = "default_min_interval")]
    pub min_interval: String,
}

fn default_urls() -> Vec<String> {
    vec!["http://localhost:8080".to_string()]
}

fn default_database() -> String {
    "public".to_string()
}

fn default_min_interval() -> String {
    "1s".to_string()
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            urls: default_urls(),
            cluster: String::new(),
            database: default_database(),
            min_interval: default_min_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("griddb-tql").join("config.toml")),
            Some(PathBuf::from("/etc/griddb-tql/config.toml")),
            Some(PathBuf::from("./griddb-tql.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Macro context carrying the configured minimum interval
    pub fn macro_context(&self) -> MacroContext<'static> {
        MacroContext::new().with_min_interval(self.datasource.min_interval.clone())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Datasource overrides
        if let Some(urls) = lookup("GRIDDB_TQL_URLS") {
            let urls: Vec<String> = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .collect();
            if !urls.is_empty() {
                self.datasource.urls = urls;
            }
        }
        if let Some(cluster) = lookup("GRIDDB_TQL_CLUSTER") {
            self.datasource.cluster = cluster;
        }
        if let Some(database) = lookup("GRIDDB_TQL_DATABASE") {
            self.datasource.database = database;
        }
        if let Some(min_interval) = lookup("GRIDDB_TQL_MIN_INTERVAL") {
            self.datasource.min_interval = min_interval;
        }

        // Logging overrides
        if let Some(level) = lookup("GRIDDB_TQL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GRIDDB_TQL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# griddb-tql Configuration
#
# Environment variables override these settings:
# - GRIDDB_TQL_URLS (comma-separated)
# - GRIDDB_TQL_CLUSTER
# - GRIDDB_TQL_DATABASE
# - GRIDDB_TQL_MIN_INTERVAL
# - GRIDDB_TQL_LOG_LEVEL
# - GRIDDB_TQL_LOG_FORMAT

[datasource]
# GridDB web API servers
urls = ["http://localhost:8080"]

# Cluster name
cluster = ""

# Database name
database = "public"

# Lower bound for $__interval (ms, s, m, h or d)
min_interval = "1s"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.datasource.database, "public");
        assert_eq!(config.datasource.min_interval, "1s");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[datasource]
urls = ["http://a:8080", "http://b:8080"]
cluster = "myCluster"
min_interval = "5s"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.datasource.urls.len(), 2);
        assert_eq!(config.datasource.cluster, "myCluster");
        assert_eq!(config.datasource.database, "public");
        assert_eq!(config.datasource.min_interval, "5s");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, generate_default_config()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.datasource.urls, vec!["http://localhost:8080"]);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[datasource\nurls = 3").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("GRIDDB_TQL_URLS", "http://x:1, http://y:2,"),
            ("GRIDDB_TQL_CLUSTER", "prod"),
            ("GRIDDB_TQL_MIN_INTERVAL", "10s"),
            ("GRIDDB_TQL_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.datasource.urls, vec!["http://x:1", "http://y:2"]);
        assert_eq!(config.datasource.cluster, "prod");
        assert_eq!(config.datasource.database, "public");
        assert_eq!(config.datasource.min_interval, "10s");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_macro_context_uses_min_interval() {
        let config = Config::default();
        assert_eq!(config.macro_context().min_interval(), Some("1s"));
    }
}
