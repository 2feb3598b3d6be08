//! DcClient - handles communication with the Digital Collections API and
//! image server.

use std::time::Duration;

use crate::capture::ListingPage;
use crate::cli::ResolutionTier;

use super::error::ApiError;
use super::listing::parse_listing_page;

/// Default base URL for the item listing API.
pub const DEFAULT_API_BASE_URL: &str = "http://api.repo.nypl.org";

/// Default base URL for the image server.
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://images.nypl.org";

/// Number of captures requested per listing page.
pub const PAGE_SIZE: u32 = 200;

/// Client for the listing endpoint and the image-fetch endpoint.
///
/// Both endpoints authenticate with `Authorization: Token token=<value>`.
pub struct DcClient {
    token: String,
    api_base_url: String,
    image_base_url: String,
    http_client: reqwest::Client,
}

impl DcClient {
    /// Create a client for the public endpoints with no request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` if `token` is empty or blank.
    pub fn new(token: String) -> Result<Self, ApiError> {
        Self::with_base_urls(
            token,
            DEFAULT_API_BASE_URL.to_string(),
            DEFAULT_IMAGE_BASE_URL.to_string(),
            None,
        )
    }

    /// Create a client against custom hosts.
    ///
    /// Useful for testing against a mock server, where both URLs usually
    /// point at the same server. `timeout` bounds each whole request; `None`
    /// waits indefinitely.
    pub fn with_base_urls(
        token: String,
        api_base_url: String,
        image_base_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::MissingToken);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            token,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    fn authorization(&self) -> String {
        format!("Token token={}", self.token)
    }

    /// Fetch one page of an item's captures.
    ///
    /// # Errors
    ///
    /// `ApiError::Transport` if the request fails, `ApiError::Status` for a
    /// non-200 response, or `ApiError::Parse` if the body does not match the
    /// listing schema.
    pub async fn fetch_listing_page(
        &self,
        item_id: &str,
        page: u32,
    ) -> Result<ListingPage, ApiError> {
        let url = format!("{}/api/v1/items/{}", self.api_base_url, item_id);
        log::debug!("GET {} page={} per_page={}", url, page, PAGE_SIZE);

        let response = self
            .http_client
            .get(&url)
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(parse_listing_page(page, &body)?)
    }

    /// Request an image at the given tier.
    ///
    /// Returns the response once its status is 200 so the caller can stream
    /// the body.
    pub async fn fetch_image(
        &self,
        image_id: &str,
        tier: ResolutionTier,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}/index.php", self.image_base_url);
        log::debug!("GET {} id={} t={}", url, image_id, tier);

        let response = self
            .http_client
            .get(&url)
            .query(&[("id", image_id), ("t", tier.code())])
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        Ok(response)
    }
}
