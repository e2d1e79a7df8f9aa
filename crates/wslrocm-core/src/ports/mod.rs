//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the provisioning steps expect from the host.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` or `reqwest` types in any signature
//! - Command execution is observed through exit code and captured output only
//! - Prompts are synchronous; the run blocks on the operator

mod command_runner;
mod download;
mod prompt;

pub use command_runner::{CommandError, CommandOutput, CommandRunner, CommandSpec, run_checked};
pub use download::{DownloadError, Downloader};
pub use prompt::{PromptError, PromptPort, parse_confirmation};
