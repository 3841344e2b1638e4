//! Configuration management
//!
//! This module handles loading, saving, and migrating the cos configuration file.
//! The configuration file is stored in TOML format at ~/.config/cos/config.toml,
//! or under `$COS_CONFIG_DIR` when that variable is set.
//!
//! Changes to schema_version require migration support.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "COS_CONFIG_DIR";

/// Default output format
const DEFAULT_OUTPUT: &str = "text";

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Keys understood by `ConfigSource` and `Config::set`
pub mod keys {
    pub const REGION: &str = "region";
    pub const SERVICE_ENDPOINT: &str = "service_endpoint";
    pub const PATH_STYLE: &str = "path_style";
    pub const OUTPUT: &str = "output";
    pub const COLOR: &str = "color";
    pub const ACCESS_KEY: &str = "access_key";
    pub const SECRET_KEY: &str = "secret_key";

    pub const ALL: &[&str] = &[
        REGION,
        SERVICE_ENDPOINT,
        PATH_STYLE,
        OUTPUT,
        COLOR,
        ACCESS_KEY,
        SECRET_KEY,
    ];
}

/// Read access to configuration values by key
///
/// The region resolver and the S3 connector only see configuration through
/// this trait.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource {
    /// Value of `key`, or `None` when it is not set
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Boolean value of `key`, or `default` when it is not set
    fn get_bool_with_default(&self, key: &str, default: bool) -> Result<bool>;
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Static HMAC credentials; the AWS default chain is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

/// Default settings for CLI behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Output format: "text" or "json"
    #[serde(default = "default_output")]
    pub output: String,

    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Region used when a command is run without --region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom service endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_endpoint: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default = "default_true")]
    pub path_style: bool,
}

/// HMAC credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            region: None,
            service_endpoint: None,
            path_style: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            credentials: None,
        }
    }
}

impl Config {
    /// Set a configuration value, validating it first
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();

        match key {
            keys::REGION => {
                if value.is_empty() {
                    return Err(Error::Config("Region cannot be empty".into()));
                }
                self.defaults.region = Some(value.to_string());
            }
            keys::SERVICE_ENDPOINT => {
                let url = url::Url::parse(value)?;
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(Error::Config(format!(
                        "Service endpoint must be an http or https URL, got '{value}'"
                    )));
                }
                self.defaults.service_endpoint = Some(value.to_string());
            }
            keys::PATH_STYLE => {
                self.defaults.path_style = parse_bool(key, value)?;
            }
            keys::OUTPUT => {
                if value != "text" && value != "json" {
                    return Err(Error::Config("Output must be 'text' or 'json'".into()));
                }
                self.defaults.output = value.to_string();
            }
            keys::COLOR => {
                if !matches!(value, "auto" | "always" | "never") {
                    return Err(Error::Config(
                        "Color must be 'auto', 'always', or 'never'".into(),
                    ));
                }
                self.defaults.color = value.to_string();
            }
            keys::ACCESS_KEY => {
                self.credentials.get_or_insert_with(Credentials::default).access_key =
                    value.to_string();
            }
            keys::SECRET_KEY => {
                self.credentials.get_or_insert_with(Credentials::default).secret_key =
                    value.to_string();
            }
            _ => return Err(unknown_key(key)),
        }

        Ok(())
    }

    /// Reset a configuration value to its default
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            keys::REGION => self.defaults.region = None,
            keys::SERVICE_ENDPOINT => self.defaults.service_endpoint = None,
            keys::PATH_STYLE => self.defaults.path_style = true,
            keys::OUTPUT => self.defaults.output = default_output(),
            keys::COLOR => self.defaults.color = default_color(),
            keys::ACCESS_KEY | keys::SECRET_KEY => self.credentials = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

impl ConfigSource for Config {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            keys::REGION => self.defaults.region.clone(),
            keys::SERVICE_ENDPOINT => self.defaults.service_endpoint.clone(),
            keys::PATH_STYLE => Some(self.defaults.path_style.to_string()),
            keys::OUTPUT => Some(self.defaults.output.clone()),
            keys::COLOR => Some(self.defaults.color.clone()),
            keys::ACCESS_KEY => self.credentials.as_ref().map(|c| c.access_key.clone()),
            keys::SECRET_KEY => self.credentials.as_ref().map(|c| c.secret_key.clone()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value.filter(|v| !v.is_empty()))
    }

    fn get_bool_with_default(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_string(key)? {
            Some(value) => parse_bool(key, &value),
            None => Ok(default),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::Config(format!(
            "'{key}' must be 'true' or 'false', got '{value}'"
        ))),
    }
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown configuration key '{key}'. Valid keys: {}",
        keys::ALL.join(", ")
    ))
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("cos"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    /// If the schema version doesn't match, attempts migration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        if config.schema_version < SCHEMA_VERSION {
            config = self.migrate(config)?;
        } else if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade cos.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Migrate configuration from older schema version
    fn migrate(&self, config: Config) -> Result<Config> {
        let mut config = config;
        tracing::info!(
            from = config.schema_version,
            to = SCHEMA_VERSION,
            "migrating configuration"
        );
        config.schema_version = SCHEMA_VERSION;
        Ok(config)
    }
}
