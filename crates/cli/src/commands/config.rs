//! Configuration commands
//!
//! Show and edit the defaults stored in the cos configuration file.

use clap::Subcommand;
use serde::Serialize;

use cos_core::config::keys;
use cos_core::{Config, ConfigManager, ConfigSource, Result};

use crate::output::Formatter;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Set a configuration value
    Set(SetArgs),

    /// Reset a configuration value to its default
    Unset(UnsetArgs),
}

/// Arguments for the `config set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// One of: region, service_endpoint, path_style, output, color, access_key, secret_key
    pub key: String,

    pub value: String,
}

/// Arguments for the `config unset` command
#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    pub key: String,
}

/// Configuration as shown to the user, secrets masked
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigView {
    config_file: String,
    region: Option<String>,
    service_endpoint: Option<String>,
    path_style: bool,
    output: String,
    color: String,
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl ConfigView {
    fn new(manager: &ConfigManager, config: &Config) -> Result<Self> {
        Ok(Self {
            config_file: manager.config_path().display().to_string(),
            region: config.get_string(keys::REGION)?,
            service_endpoint: config.get_string(keys::SERVICE_ENDPOINT)?,
            path_style: config.get_bool_with_default(keys::PATH_STYLE, true)?,
            output: config.defaults.output.clone(),
            color: config.defaults.color.clone(),
            access_key: config.get_string(keys::ACCESS_KEY)?.map(|k| mask(&k, 4)),
            secret_key: config.get_string(keys::SECRET_KEY)?.map(|k| mask(&k, 0)),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigChange {
    key: String,
    value: Option<String>,
}

/// Keep the first `visible` characters and hide the rest
fn mask(secret: &str, visible: usize) -> String {
    let shown: String = secret.chars().take(visible).collect();
    format!("{shown}****")
}

fn is_secret(key: &str) -> bool {
    key == keys::ACCESS_KEY || key == keys::SECRET_KEY
}

/// Execute a config subcommand
pub fn execute(cmd: ConfigCommands, manager: &ConfigManager, formatter: &Formatter) -> Result<()> {
    let mut config = manager.load()?;

    match cmd {
        ConfigCommands::Show => formatter.success(&ConfigView::new(manager, &config)?, None),
        ConfigCommands::Set(args) => {
            config.set(&args.key, &args.value)?;
            manager.save(&config)?;
            tracing::debug!(key = %args.key, "configuration value set");

            let value = config
                .get_string(&args.key)?
                .map(|v| if is_secret(&args.key) { mask(&v, 0) } else { v });
            formatter.success(
                &ConfigChange {
                    key: args.key,
                    value,
                },
                None,
            )
        }
        ConfigCommands::Unset(args) => {
            config.unset(&args.key)?;
            manager.save(&config)?;
            tracing::debug!(key = %args.key, "configuration value reset");

            let value = config.get_string(&args.key)?;
            formatter.success(
                &ConfigChange {
                    key: args.key,
                    value,
                },
                None,
            )
        }
    }
}
