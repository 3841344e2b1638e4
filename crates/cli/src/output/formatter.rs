//! Output formatter for human-readable and JSON output
//!
//! Ensures consistent output formatting across all commands.
//! Successful results go to stdout, failures to stderr.

use serde::Serialize;

use cos_core::Result;

use super::{OutputConfig, ProgressBar, render};

/// Marker line that starts every successful text result
pub const OK_MARKER: &str = "OK";

/// Prefix of every failure line in text mode
pub const FAILED_MARKER: &str = "FAILED";

/// Formatter for CLI output
///
/// Handles both human-readable and JSON output formats based on configuration.
/// When JSON mode is enabled, all output is strict JSON without colors or progress.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Print a successful result
    ///
    /// `empty_message` replaces the field lines when the result carries no
    /// data at all.
    pub fn success<T: Serialize>(&self, value: &T, empty_message: Option<&str>) -> Result<()> {
        if self.config.quiet {
            return Ok(());
        }

        for line in self.success_lines(value, empty_message)? {
            println!("{line}");
        }
        Ok(())
    }

    /// The lines `success` prints
    pub fn success_lines<T: Serialize>(
        &self,
        value: &T,
        empty_message: Option<&str>,
    ) -> Result<Vec<String>> {
        if self.config.json {
            // JSON output: strict, no colors, no extra formatting
            return Ok(vec![serde_json::to_string_pretty(value)?]);
        }

        let value = serde_json::to_value(value)?;
        let mut lines = vec![self.styled_ok()];

        if render::is_empty(&value)
            && let Some(message) = empty_message
        {
            lines.push(message.to_string());
        } else {
            lines.extend(render::render_value(&value));
        }

        Ok(lines)
    }

    /// Print a failure
    ///
    /// Failures are always printed, even in quiet mode.
    pub fn failure(&self, message: &str) {
        eprintln!("{}", self.failure_text(message));
    }

    pub fn failure_text(&self, message: &str) -> String {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
        } else if self.colors_enabled() {
            format!("{}\n{message}", console::style(FAILED_MARKER).for_stderr().red().bold())
        } else {
            format!("{FAILED_MARKER}\n{message}")
        }
    }

    /// Print command usage after a usage error
    pub fn usage(&self, usage: &str) {
        if self.config.json {
            return;
        }
        eprintln!("\n{usage}");
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        println!("{message}");
    }

    /// Spinner for a transfer; hidden in quiet, JSON or no-progress mode
    pub fn spinner(&self, message: &str) -> ProgressBar {
        ProgressBar::spinner(self.config.clone(), message)
    }

    fn styled_ok(&self) -> String {
        if self.colors_enabled() {
            console::style(OK_MARKER).green().bold().to_string()
        } else {
            OK_MARKER.to_string()
        }
    }
}
