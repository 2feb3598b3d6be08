//! Digital Collections API access.
//!
//! This module provides the HTTP client for the item listing and image-fetch
//! endpoints, the listing wire schema, and the retry budget both callers
//! share.

mod client;
mod error;
mod listing;
mod retry;

pub use client::{DcClient, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL, PAGE_SIZE};
pub use error::{describe_status, ApiError};
pub use listing::parse_listing_page;
pub use retry::{RetryBudget, RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
