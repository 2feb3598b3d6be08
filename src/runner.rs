//! Sequential enumerate-then-download run.

use crate::api::{ApiError, DcClient};
use crate::capture::DownloadRequest;
use crate::config::{ConfigError, Configuration};
use crate::downloader::CaptureDownloader;
use crate::enumerator::CaptureEnumerator;

/// What a run accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Captures returned by the listing.
    pub listed: usize,
    /// Captures written to disk.
    pub saved: usize,
    /// Image ids of captures that were abandoned.
    pub failed: Vec<String>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Downloaded {} of {} captures ({} failed)",
            self.saved,
            self.listed,
            self.failed.len()
        )
    }
}

/// Why a run could not start.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Build a client from `config`.
pub fn client_from_config(config: &Configuration) -> Result<DcClient, ApiError> {
    DcClient::with_base_urls(
        config.auth_token.clone(),
        config.api.base_url.clone(),
        config.api.image_base_url.clone(),
        config.api.timeout(),
    )
}

/// Enumerate the configured item, then download each capture in order.
///
/// Only the startup checks (output directory, token) can fail, before any
/// request is made. Listing and download failures are absorbed and
/// reflected in the summary.
pub async fn run(config: &Configuration) -> Result<RunSummary, RunError> {
    config.validate_output_directory()?;
    let client = client_from_config(config)?;

    let records = CaptureEnumerator::new(&client, config.retry)
        .enumerate(&config.item_id)
        .await;
    log::info!("Found {} captures for item {}", records.len(), config.item_id);

    let downloader = CaptureDownloader::new(&client, config.retry);
    let mut summary = RunSummary {
        listed: records.len(),
        ..RunSummary::default()
    };

    for record in &records {
        let request = DownloadRequest::from_config(record, config);
        if downloader.download(&request).await.is_saved() {
            summary.saved += 1;
        } else {
            summary.failed.push(record.image_id.clone());
        }
    }

    Ok(summary)
}
