//! CaptureEnumerator - walks the paginated listing of an item's captures.

use crate::api::{describe_status, DcClient, RetryBudget, RetryPolicy, PAGE_SIZE};
use crate::capture::CaptureRecord;

/// Collects every capture record of an item, page by page.
///
/// The retry budget is shared by the whole walk: once it is spent on any
/// page, enumeration stops and whatever was collected is returned.
pub struct CaptureEnumerator<'a> {
    client: &'a DcClient,
    retry: RetryPolicy,
}

impl<'a> CaptureEnumerator<'a> {
    /// The client carries the auth token used for every listing request.
    pub fn new(client: &'a DcClient, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Return the item's capture records in listing order.
    ///
    /// Never fails: a spent retry budget yields the records gathered so far,
    /// which may be none.
    pub async fn enumerate(&self, item_id: &str) -> Vec<CaptureRecord> {
        let mut budget = RetryBudget::new(self.retry);
        let mut records = Vec::new();
        let mut page = 1u32;
        let mut reported_total = None;

        loop {
            match self.client.fetch_listing_page(item_id, page).await {
                Ok(listing) => {
                    log::debug!(
                        "Listing page {} returned {} captures ({} total)",
                        listing.page_number,
                        listing.records.len(),
                        listing.total_result_count
                    );
                    reported_total = Some(listing.total_result_count);
                    records.extend(listing.records);

                    match next_page(page, listing.total_result_count) {
                        Some(next) => page = next,
                        None => break,
                    }
                }
                Err(err) => {
                    println!("Listing request for page {} failed: {}", page, err);
                    if !budget.record_failure() {
                        println!(
                            "Failure to receive needed API response after {} attempts (latest HTTP status: {})",
                            budget.failures(),
                            describe_status(err.status())
                        );
                        break;
                    }
                    println!(
                        "Retrying page {} in {:?} (attempt {}/{})...",
                        page,
                        budget.delay(),
                        budget.failures() + 1,
                        budget.max_attempts()
                    );
                    budget.wait().await;
                }
            }
        }

        if let Some(total) = reported_total {
            if records.len() as u64 != total {
                log::warn!(
                    "Collected {} captures but the listing reported {}",
                    records.len(),
                    total
                );
            }
        }

        records
    }
}

/// Decide which page to fetch after `current`, given the reported total.
///
/// Items with no more than one page of results stop after the first page.
/// Otherwise pages advance until the captures already requested exceed the
/// total.
pub fn next_page(current: u32, total_result_count: u64) -> Option<u32> {
    let page_size = u64::from(PAGE_SIZE);
    if total_result_count <= page_size {
        return None;
    }
    if u64::from(current) * page_size > total_result_count {
        return None;
    }
    Some(current + 1)
}
