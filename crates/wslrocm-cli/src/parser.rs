//! Top-level argument parsing.

use clap::Parser;

use crate::commands::Commands;

/// Install ROCm, PyTorch and ComfyUI inside a WSL Ubuntu distribution.
///
/// Without a subcommand the full install runs.
#[derive(Parser, Debug)]
#[command(name = "wslrocm")]
#[command(about = "Install ROCm, PyTorch and ComfyUI on WSL")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to run; the full install when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Install)
    }
}
