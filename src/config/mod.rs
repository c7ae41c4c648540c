//! Configuration management
//!
//! Settings are loaded from a TOML file, overridden from the environment and
//! validated before use.

use crate::error::{MindbreezeError, Result};
use crate::response::HttpErrorPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub endpoint: EndpointConfig,
    pub request: RequestConfig,
    /// Named datasource constraints: name -> datasource ids it restricts to
    #[serde(default)]
    pub datasources: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub storage: StorageConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Request defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub per_page: u32,
    pub page_count: u32,
    pub alternatives: u32,
    pub content_sample_length: u32,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub facets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default)]
    pub clear_token_on_http_error: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file token store
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MindbreezeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Parse and validate configuration text, without env overrides
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| MindbreezeError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    pub fn http_error_policy(&self) -> HttpErrorPolicy {
        HttpErrorPolicy::from_clear_flag(self.pagination.clear_token_on_http_error)
    }

    /// Apply environment variable overrides
    /// Environment variables in format: MINDBREEZE_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("MINDBREEZE_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "ENDPOINT__URL" => {
                self.endpoint.url = value.to_string();
            }
            "ENDPOINT__TIMEOUT_SECS" => {
                self.endpoint.timeout_secs = parse_env(path, value)?;
            }
            "REQUEST__PER_PAGE" => {
                self.request.per_page = parse_env(path, value)?;
            }
            "PAGINATION__CLEAR_TOKEN_ON_HTTP_ERROR" => {
                self.pagination.clear_token_on_http_error = parse_env(path, value)?;
            }
            "STORAGE__DATA_DIR" => {
                self.storage.data_dir = PathBuf::from(value);
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            MindbreezeError::Config("Cannot determine config directory".to_string())
        })?;

        Ok(config_dir.join("mindbreeze").join("config.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| MindbreezeError::InvalidConfigValue {
        path: path.to_string(),
        message: format!("Cannot parse '{}'", value),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            endpoint: EndpointConfig {
                url: "http://localhost:23352/api/v2/search".to_string(),
                timeout_secs: 30,
            },
            request: RequestConfig {
                per_page: 10,
                page_count: 10,
                alternatives: 10,
                content_sample_length: 300,
                properties: vec!["title".to_string(), "content".to_string()],
                facets: Vec::new(),
            },
            datasources: BTreeMap::new(),
            pagination: PaginationConfig::default(),
            storage: StorageConfig {
                data_dir: PathBuf::from("~/.mindbreeze"),
            },
        }
    }
}
