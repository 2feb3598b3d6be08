//! Capture records and the per-capture download request.

use std::path::{Path, PathBuf};

use crate::cli::ResolutionTier;
use crate::config::Configuration;
use crate::filename::FilenameFields;

/// Number of leading characters stripped from the last sort-string segment.
pub const SORT_KEY_PREFIX_LEN: usize = 7;

/// One image capture belonging to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub image_id: String,
    pub capture_uuid: String,
    pub sort_key: String,
}

impl CaptureRecord {
    /// Build a record from the raw listing fields, deriving the sort key.
    pub fn new(image_id: String, capture_uuid: String, sort_string: &str) -> Self {
        Self {
            image_id,
            capture_uuid,
            sort_key: sort_key_from_sort_string(sort_string),
        }
    }
}

/// Derive a sort key from a pipe-delimited sort string.
///
/// Takes the last `|` segment and drops its first seven characters, so
/// `"a|b|XXXXXXXc123"` becomes `"c123"`. Segments shorter than the prefix
/// yield an empty key.
pub fn sort_key_from_sort_string(sort_string: &str) -> String {
    sort_string
        .rsplit('|')
        .next()
        .unwrap_or_default()
        .chars()
        .skip(SORT_KEY_PREFIX_LEN)
        .collect()
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// 1-based page number this page was requested as.
    pub page_number: u32,
    /// Total number of captures the item has, as reported by the server.
    pub total_result_count: u64,
    pub records: Vec<CaptureRecord>,
}

/// Everything needed to fetch and store one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub image_id: String,
    pub capture_uuid: String,
    pub sort_key: String,
    pub resolution_tier: ResolutionTier,
    pub filename_fields: FilenameFields,
    pub output_directory: PathBuf,
}

impl DownloadRequest {
    pub fn new(
        record: &CaptureRecord,
        resolution_tier: ResolutionTier,
        filename_fields: FilenameFields,
        output_directory: &Path,
    ) -> Self {
        Self {
            image_id: record.image_id.clone(),
            capture_uuid: record.capture_uuid.clone(),
            sort_key: record.sort_key.clone(),
            resolution_tier,
            filename_fields,
            output_directory: output_directory.to_path_buf(),
        }
    }

    /// Build the request for `record` from the run-wide configuration.
    pub fn from_config(record: &CaptureRecord, config: &Configuration) -> Self {
        Self::new(
            record,
            config.resolution_tier,
            config.filename_fields,
            &config.output_directory,
        )
    }

    pub fn filename(&self) -> String {
        self.filename_fields.compose(
            &self.sort_key,
            &self.image_id,
            &self.capture_uuid,
            self.resolution_tier,
        )
    }

    /// Final path the image is written to.
    pub fn destination(&self) -> PathBuf {
        self.output_directory.join(self.filename())
    }
}
