//! Subcommands.

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the full ROCm, PyTorch and ComfyUI install (the default)
    Install,

    /// Verify the ROCm driver stack and HSA runtime library without changing anything
    CheckGpu,

    /// Show the resolved installer configuration
    Paths {
        /// Print JSON instead of `key = value` lines
        #[arg(long)]
        json: bool,
    },
}
