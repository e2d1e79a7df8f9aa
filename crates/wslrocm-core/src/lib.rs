#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{ConfigError, InstallerConfig, RocmRelease, WheelArtifact};
pub use domain::{ConflictChoice, ProvisionReport, RunStatus, StepId, StepOutcome, StepWarning};
pub use error::{ErrorKind, ProvisionError, ProvisionFailure};
pub use paths::{PathError, backup_dir_name, backup_path, resolve_home_dir};
pub use ports::{
    CommandError, CommandOutput, CommandRunner, CommandSpec, DownloadError, Downloader,
    PromptError, PromptPort, run_checked,
};

#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
