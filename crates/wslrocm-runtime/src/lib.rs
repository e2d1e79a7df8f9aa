#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]

pub mod download;
pub mod progress;
pub mod prompt;
pub mod provision;
pub mod system;

// Re-export the adapters the CLI wires together
pub use download::HttpDownloader;
pub use progress::{NoopProgress, ProgressReporter};
pub use prompt::{NonInteractivePrompt, ScriptedPrompt};
pub use provision::{ActiveEnvironment, ProvisionContext, Provisioner};
pub use system::SystemCommandRunner;

#[cfg(feature = "cli")]
pub use progress::CliProgress;
#[cfg(feature = "cli")]
pub use prompt::CliPrompt;
