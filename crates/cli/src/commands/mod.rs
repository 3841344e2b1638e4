//! CLI command definitions and execution
//!
//! Storage operations are generated from the operation registry; `config`
//! and `completions` are ordinary clap subcommands.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

use cos_core::{Config, ConfigManager, Connector, Error};
use cos_s3::S3Connector;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod bucket;
mod bucket_config;
mod completions;
mod config;
mod multipart;
mod object;
pub mod operation;

pub use operation::{OPERATIONS, OperationCall, Session};

/// cos - command-line client for S3-compatible cloud object storage
///
/// Every storage command takes its request fields as flags. Structured
/// fields accept shorthand (Key=Value,List=[{...}]) or JSON.
#[derive(Parser, Debug)]
#[command(name = "cos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format [default: configured output, else text]
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinners
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Operation(OperationCall),

    /// Show or change the stored defaults
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    execute_with(cli, Arc::new(S3Connector)).await
}

/// Execute with a specific storage connector
pub async fn execute_with(cli: Cli, connector: Arc<dyn Connector>) -> ExitCode {
    let Cli {
        command,
        output,
        no_color,
        no_progress,
        quiet,
        ..
    } = cli;

    let command = match command {
        Commands::Completions(args) => {
            completions::execute(args);
            return ExitCode::Success;
        }
        other => other,
    };

    let flags = OutputConfig {
        json: output == Some(OutputFormat::Json),
        no_color,
        no_progress,
        quiet,
    };

    let loaded = ConfigManager::new().and_then(|manager| {
        let config = manager.load()?;
        Ok((manager, config))
    });
    let (manager, config) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            Formatter::new(flags).failure(&e.to_string());
            return ExitCode::Failure;
        }
    };

    let output_config = output_config(flags, output.is_some(), &config);
    if !output_config.no_color && config.defaults.color == "always" {
        console::set_colors_enabled(true);
        console::set_colors_enabled_stderr(true);
    }
    let formatter = Formatter::new(output_config);

    let (result, usage_for) = match command {
        Commands::Operation(call) => {
            let session = Session {
                config,
                formatter: formatter.clone(),
                connector,
            };
            (operation::dispatch(&call, &session).await, Some(call.name))
        }
        Commands::Config(cmd) => (config::execute(cmd, &manager, &formatter), None),
        Commands::Completions(_) => (Ok(()), None),
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            report(&formatter, &e, usage_for.as_deref());
            ExitCode::Failure
        }
    }
}

/// Merge command-line output flags with the configured defaults
///
/// Flags win; `output` and `color` from the configuration apply only when
/// no flag says otherwise.
fn output_config(mut flags: OutputConfig, output_flag_given: bool, config: &Config) -> OutputConfig {
    if !output_flag_given {
        flags.json = config.defaults.output == "json";
    }
    if config.defaults.color == "never" {
        flags.no_color = true;
    }
    flags
}

fn report(formatter: &Formatter, error: &Error, operation: Option<&str>) {
    tracing::debug!(?error, "command failed");
    formatter.failure(&error.to_string());

    if error.is_usage()
        && let Some(usage) = operation.and_then(usage)
    {
        formatter.usage(&usage);
    }
}

/// Rendered usage line of one subcommand
fn usage(name: &str) -> Option<String> {
    let mut cmd = Cli::command();
    cmd.build();
    cmd.find_subcommand_mut(name)
        .map(|sub| sub.render_usage().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_operation() {
        let cli = Cli::try_parse_from([
            "cos", "buckets", "--output", "json", "--no-color", "-q",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.no_color);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Operation(ref call) if call.name == "buckets"));
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = Cli::try_parse_from(["cos", "config", "set", "region", "us-south"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(_)));
    }

    #[test]
    fn test_unknown_operation_flag_is_rejected_by_clap() {
        let err = Cli::try_parse_from(["cos", "buckets", "--bucket", "b"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_output_defaults_from_config() {
        let mut config = Config::default();
        config.set("output", "json").unwrap();
        config.set("color", "never").unwrap();

        let merged = output_config(OutputConfig::default(), false, &config);
        assert!(merged.json);
        assert!(merged.no_color);

        // An explicit --output text wins over the configured json
        let merged = output_config(OutputConfig::default(), true, &config);
        assert!(!merged.json);
    }

    #[test]
    fn test_usage_names_operation_flags() {
        let line = usage("objects-delete").unwrap();
        assert!(line.contains("objects-delete"));
        assert!(usage("no-such-operation").is_none());
    }
}
