//! CaptureDownloader - fetches one capture's image and writes it to disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::api::{describe_status, ApiError, DcClient, RetryBudget, RetryPolicy};
use crate::capture::DownloadRequest;

/// Why a single download attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            DownloadError::Api(err) => err.status(),
            DownloadError::Io(_) => None,
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        DownloadError::Api(ApiError::Transport(err))
    }
}

/// Result of downloading one capture.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The image was written to `path`.
    Saved { path: PathBuf, attempts: u32 },
    /// Every attempt failed; nothing was written.
    Failed {
        attempts: u32,
        last_error: DownloadError,
    },
}

impl DownloadOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, DownloadOutcome::Saved { .. })
    }
}

/// Downloads captures one at a time, each with its own retry budget.
pub struct CaptureDownloader<'a> {
    client: &'a DcClient,
    retry: RetryPolicy,
}

impl<'a> CaptureDownloader<'a> {
    pub fn new(client: &'a DcClient, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetch the image for `request` and write it under its computed name.
    ///
    /// Failures are reported and returned as [`DownloadOutcome::Failed`];
    /// they never abort the caller.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadOutcome {
        let mut budget = RetryBudget::new(self.retry);

        loop {
            match self.attempt(request).await {
                Ok(path) => {
                    log::debug!("Saved image {} to {}", request.image_id, path.display());
                    return DownloadOutcome::Saved {
                        path,
                        attempts: budget.failures() + 1,
                    };
                }
                Err(err) => {
                    println!(
                        "API response failure in retrieving image capture {}: {}",
                        request.image_id, err
                    );
                    if !budget.record_failure() {
                        println!(
                            "Failure to receive image {} after {} attempts (latest HTTP status: {})",
                            request.image_id,
                            budget.failures(),
                            describe_status(err.status())
                        );
                        return DownloadOutcome::Failed {
                            attempts: budget.failures(),
                            last_error: err,
                        };
                    }
                    println!("Trying again in {:?}.", budget.delay());
                    budget.wait().await;
                }
            }
        }
    }

    async fn attempt(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
        let response = self
            .client
            .fetch_image(&request.image_id, request.resolution_tier)
            .await?;
        println!("Downloading image {}", request.image_id);

        let dest = request.destination();
        write_body(response, &dest).await?;
        Ok(dest)
    }
}

/// Stream the response body into `<dest>.part`, then move it onto `dest`.
///
/// The partial file is removed whenever either step fails.
async fn write_body(response: reqwest::Response, dest: &Path) -> Result<(), DownloadError> {
    let partial = partial_path(dest);
    let result = match stream_to_file(response, &partial).await {
        Ok(()) => tokio::fs::rename(&partial, dest)
            .await
            .map_err(DownloadError::from),
        Err(err) => Err(err),
    };
    if result.is_err() {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            log::debug!("Could not remove {}: {}", partial.display(), cleanup);
        }
    }
    result
}

async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }

    file.flush().await?;
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
