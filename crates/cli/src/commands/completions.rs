//! Shell completion generation
//!
//! Generate shell completion scripts for bash, zsh, fish, and powershell.
//! Every storage operation and its field flags are included.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Generator, Shell};

use super::Cli;

/// Arguments for the completions command
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate shell completions and print to stdout
pub fn execute(args: CompletionsArgs) {
    generate(args.shell, &mut std::io::stdout());
}

fn generate<G: Generator>(generator: G, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(generator, &mut cmd, name, out);
}
