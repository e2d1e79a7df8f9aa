//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(config: &InstallerConfig, ...) -> Result<u8>`
//! - Thin wrappers that build the pipeline, run it and format the result
//! - The returned value is the process exit code

pub mod check_gpu;
pub mod install;
pub mod paths;
