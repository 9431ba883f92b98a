//! Image download collaborator
//!
//! Downloads article photos into a local directory, keyed by filename. A
//! failed download is the caller's problem only to the extent of a log line:
//! the article record keeps its photo field either way.

use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching or writing an image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Request failed for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Local image store backed by a directory on disk
pub struct ImageStore {
    client: Client,
    dir: PathBuf,
    timeout: Duration,
}

impl ImageStore {
    /// Creates the store, making sure the target directory exists
    pub fn new(dir: &Path, timeout: Duration) -> Result<Self, ImageError> {
        std::fs::create_dir_all(dir).map_err(|e| ImageError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let client = Client::builder().build().map_err(ImageError::Client)?;

        Ok(Self {
            client,
            dir: dir.to_path_buf(),
            timeout,
        })
    }

    /// Downloads `url` into the store under `filename`
    ///
    /// Bounded by the store's timeout. Returns the path the image was
    /// written to.
    pub async fn download(&self, url: &str, filename: &str) -> Result<PathBuf, ImageError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ImageError::Http {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| ImageError::Http {
            url: url.to_string(),
            source: e,
        })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ImageError::Io {
                path: path.clone(),
                source: e,
            })?;

        tracing::debug!(url, path = %path.display(), "image downloaded");
        Ok(path)
    }
}
