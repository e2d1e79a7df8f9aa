//! File download port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while downloading an artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Download of {url} failed: HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Port for fetching a URL into a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// `dest` only appears once the transfer is complete.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;
}
