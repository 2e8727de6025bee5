//! Configuration loading and validation for prospecto.
//!
//! Loads configuration from `prospecto.toml` in the working directory
//! with environment variable overrides. Validates all settings at
//! startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "prospecto.toml";

/// The root configuration structure.
///
/// Maps directly to `prospecto.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// State persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog and message file locations
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Outbound delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3008
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding user state and contact requests.
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

fn default_db_file() -> String {
    "data/estado.json".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    #[serde(default = "default_brochure_file")]
    pub brochure_file: String,

    /// Directory of editable menu texts; missing files fall back to the
    /// built-in copy.
    #[serde(default = "default_messages_dir")]
    pub messages_dir: String,
}

fn default_catalog_file() -> String {
    "data/catalog.json".into()
}
fn default_brochure_file() -> String {
    "data/brochures.json".into()
}
fn default_messages_dir() -> String {
    "messages".into()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_file: default_catalog_file(),
            brochure_file: default_brochure_file(),
            messages_dir: default_messages_dir(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// "wpp" for the WPPConnect bridge, "console" for stdout.
    #[serde(default = "default_adapter")]
    pub adapter: String,

    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    #[serde(default = "default_session")]
    pub session: String,

    /// Bearer token for the bridge. Usually set via env, not the file.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_retry_attempts")]
    pub media_retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub media_retry_delay_ms: u64,
}

fn default_adapter() -> String {
    "wpp".into()
}
fn default_bridge_url() -> String {
    "http://localhost:21465".into()
}
fn default_session() -> String {
    "prospecto".into()
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    800
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            adapter: default_adapter(),
            bridge_url: default_bridge_url(),
            session: default_session(),
            token: String::new(),
            media_retry_attempts: default_retry_attempts(),
            media_retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &str) -> &'static str {
    if s.is_empty() { "" } else { "[REDACTED]" }
}

impl std::fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("adapter", &self.adapter)
            .field("bridge_url", &self.bridge_url)
            .field("session", &self.session)
            .field("token", &redact(&self.token))
            .field("media_retry_attempts", &self.media_retry_attempts)
            .field("media_retry_delay_ms", &self.media_retry_delay_ms)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from `prospecto.toml` when no
    /// path is given.
    ///
    /// Environment variables override the file:
    /// - `PROSPECTO_PORT`
    /// - `PROSPECTO_BRIDGE_URL`
    /// - `PROSPECTO_BRIDGE_TOKEN`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        let path = path.unwrap_or(&default_path);
        let mut config = Self::load_from(path)?;

        if let Ok(port) = std::env::var("PROSPECTO_PORT") {
            config.server.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "PROSPECTO_PORT must be a port number, got {port:?}"
                ))
            })?;
        }
        if let Ok(url) = std::env::var("PROSPECTO_BRIDGE_URL") {
            config.delivery.bridge_url = url;
        }
        if let Ok(token) = std::env::var("PROSPECTO_BRIDGE_TOKEN") {
            config.delivery.token = token;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".into(),
            ));
        }

        match self.delivery.adapter.as_str() {
            "wpp" | "console" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "delivery.adapter must be \"wpp\" or \"console\", got {other:?}"
                )));
            }
        }

        if self.delivery.adapter == "wpp" && self.delivery.bridge_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "delivery.bridge_url must be set for the wpp adapter".into(),
            ));
        }

        if self.delivery.media_retry_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "delivery.media_retry_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3008);
        assert_eq!(config.delivery.adapter, "wpp");
        assert_eq!(config.storage.db_file, "data/estado.json");
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.delivery.bridge_url, config.delivery.bridge_url);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/prospecto.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.server.port, 3008);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[server]\nport = 4000\n\n[delivery]\nadapter = \"console\"\n"
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.delivery.adapter, "console");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.catalog.catalog_file, "data/catalog.json");
    }

    #[test]
    fn unknown_adapter_rejected() {
        let config = AppConfig {
            delivery: DeliveryConfig {
                adapter: "telegrama".into(),
                ..DeliveryConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retry_attempts_rejected() {
        let config = AppConfig {
            delivery: DeliveryConfig {
                media_retry_attempts: 0,
                ..DeliveryConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("3008"));
        assert!(toml_str.contains("wpp"));
        assert!(toml_str.contains("data/estado.json"));
    }

    #[test]
    fn debug_redacts_token() {
        let config = DeliveryConfig {
            token: "super-secret-token".into(),
            ..DeliveryConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
