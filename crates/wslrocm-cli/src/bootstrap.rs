//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where concrete adapters are instantiated:
//! - System command runner (tokio process, via wslrocm-runtime)
//! - Terminal prompt (stdin/stdout)
//! - HTTP downloader with indicatif progress bars
//!
//! Handlers receive a [`Provisioner`] built from these and never construct
//! adapters themselves.

use tracing_subscriber::EnvFilter;
use wslrocm_core::InstallerConfig;
use wslrocm_runtime::{CliProgress, CliPrompt, HttpDownloader, Provisioner, SystemCommandRunner};

use crate::error::CliError;

/// Initialise logging on stderr.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, defaulting to `warn`
/// so step output on stdout stays readable.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the installer configuration from defaults and `WSLROCM_*` overrides.
pub fn load_config() -> Result<InstallerConfig, CliError> {
    Ok(InstallerConfig::from_env()?)
}

/// Host adapters for one CLI invocation.
pub struct Adapters {
    runner: SystemCommandRunner,
    prompt: CliPrompt,
    downloader: HttpDownloader,
}

impl Adapters {
    pub fn new() -> Self {
        Self {
            runner: SystemCommandRunner::new(),
            prompt: CliPrompt::new(),
            downloader: HttpDownloader::with_progress(Box::new(CliProgress::new())),
        }
    }

    pub fn provisioner<'a>(&'a self, config: &'a InstallerConfig) -> Provisioner<'a> {
        Provisioner::new(config, &self.runner, &self.prompt, &self.downloader)
    }
}

impl Default for Adapters {
    fn default() -> Self {
        Self::new()
    }
}
