//! Progress reporting for artifact downloads.
//!
//! # Feature Flags
//!
//! - `cli`: Enables `CliProgress` which uses `indicatif` for terminal progress bars.
//!   Without this feature, only `NoopProgress` is available.

/// Receives progress updates during a download.
pub trait ProgressReporter: Send + Sync {
    /// Called when a transfer starts. `total` is the size in bytes if known.
    fn start(&self, message: &str, total: Option<u64>);

    /// Called with the number of bytes received so far.
    fn update(&self, current: u64, total: Option<u64>);

    /// Called when the transfer completes.
    fn finish(&self, message: &str);

    /// Called when the transfer fails.
    fn finish_with_error(&self, message: &str);
}

/// A progress reporter that ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _message: &str, _total: Option<u64>) {}
    fn update(&self, _current: u64, _total: Option<u64>) {}
    fn finish(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

/// Terminal progress bars.
///
/// This is only available with the `cli` feature flag.
#[cfg(feature = "cli")]
pub mod cli_progress {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use indicatif::{ProgressBar, ProgressStyle};

    use super::ProgressReporter;

    const BAR_TEMPLATE: &str =
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}";
    const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bytes} {msg}";

    #[derive(Default)]
    pub struct CliProgress {
        bar: Mutex<Option<ProgressBar>>,
    }

    impl CliProgress {
        pub fn new() -> Self {
            Self::default()
        }

        fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
            self.bar.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn create_download_bar(total: u64) -> ProgressBar {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("█▓░"));
            pb.set_style(style);
            pb
        }

        fn create_spinner() -> ProgressBar {
            let pb = ProgressBar::new_spinner();
            let style = ProgressStyle::default_spinner()
                .template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            pb.set_style(style);
            pb
        }
    }

    impl ProgressReporter for CliProgress {
        fn start(&self, message: &str, total: Option<u64>) {
            let pb = match total {
                Some(t) if t > 0 => Self::create_download_bar(t),
                _ => Self::create_spinner(),
            };
            pb.set_message(message.to_string());
            *self.slot() = Some(pb);
        }

        fn update(&self, current: u64, total: Option<u64>) {
            if let Some(pb) = self.slot().as_ref() {
                if let Some(t) = total {
                    pb.set_length(t);
                }
                pb.set_position(current);
            }
        }

        fn finish(&self, message: &str) {
            if let Some(pb) = self.slot().take() {
                pb.finish_with_message(message.to_string());
            }
        }

        fn finish_with_error(&self, message: &str) {
            if let Some(pb) = self.slot().take() {
                pb.abandon_with_message(message.to_string());
            }
        }
    }
}

#[cfg(feature = "cli")]
pub use cli_progress::CliProgress;
