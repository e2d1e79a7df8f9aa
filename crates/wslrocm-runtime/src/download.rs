//! HTTP artifact download.
//!
//! Artifacts are streamed to `<dest>.part` and renamed into place once the
//! body is complete, so an interrupted transfer never leaves a truncated file
//! where a later run would mistake it for a finished download.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, info};
use wslrocm_core::ports::{DownloadError, Downloader};

use crate::progress::{NoopProgress, ProgressReporter};

const USER_AGENT: &str = "wslrocm";

/// [`Downloader`] backed by `reqwest`.
pub struct HttpDownloader {
    client: Client,
    progress: Box<dyn ProgressReporter>,
}

impl HttpDownloader {
    /// Downloader without progress output.
    pub fn new() -> Self {
        Self::with_progress(Box::new(NoopProgress))
    }

    pub fn with_progress(progress: Box<dyn ProgressReporter>) -> Self {
        Self {
            client: Client::new(),
            progress,
        }
    }

    async fn stream_to(
        &self,
        response: reqwest::Response,
        url: &str,
        partial: &Path,
        total: Option<u64>,
    ) -> Result<u64, DownloadError> {
        let write_error = |e: std::io::Error| DownloadError::Write {
            path: partial.to_path_buf(),
            reason: e.to_string(),
        };

        let mut file = File::create(partial).map_err(write_error)?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            file.write_all(&chunk).map_err(write_error)?;
            downloaded += chunk.len() as u64;
            self.progress.update(downloaded, total);
        }

        file.flush().map_err(write_error)?;
        Ok(downloaded)
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        debug!(url, dest = %dest.display(), "Starting download");

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| DownloadError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| DownloadError::Write {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let total = response.content_length();
        let partial = partial_path(dest);
        let label = dest
            .file_name()
            .map_or_else(|| url.to_string(), |n| n.to_string_lossy().into_owned());

        self.progress.start(&format!("Downloading {label}"), total);
        let downloaded = match self.stream_to(response, url, &partial, total).await {
            Ok(n) => n,
            Err(e) => {
                self.progress.finish_with_error(&format!("Failed: {label}"));
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
        };

        fs::rename(&partial, dest).map_err(|e| DownloadError::Write {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.progress.finish(&format!("Downloaded {label}"));

        info!(url, dest = %dest.display(), bytes = downloaded, "Download complete");
        Ok(downloaded)
    }
}

/// `<dest>.part`, next to the final file.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_sits_next_to_destination() {
        let dest = Path::new("/tmp/work/torch-2.3.0-cp310-cp310-linux_x86_64.whl");
        assert_eq!(
            partial_path(dest),
            PathBuf::from("/tmp/work/torch-2.3.0-cp310-cp310-linux_x86_64.whl.part")
        );
    }

    #[test]
    fn unreachable_host_is_a_request_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("artifact.deb");
        let downloader = HttpDownloader::new();

        let result = tokio_test::block_on(downloader.download("http://127.0.0.1:1/artifact.deb", &dest));

        assert!(matches!(result, Err(DownloadError::Request { .. })));
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }
}
