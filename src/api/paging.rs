//! Page-walking over list-style endpoints.
//!
//! The server exposes a `HasNextPage` flag per page; pages are requested
//! from 1 upward and their items concatenated in server order. A failed or
//! empty page ends the walk and whatever accumulated so far is returned.
//! This is a partial-result policy, not a failure: the walker never errors.

use crate::Result;

/// Page size requested from every list endpoint.
pub const PAGE_SIZE: u32 = 100;

/// A paginated response: a batch of items plus a has-next-page flag.
pub trait PageResponse {
    /// The item type accumulated across pages.
    type Item;

    /// Endpoint-level success flag; a failed page stops the walk.
    fn succeeded(&self) -> bool {
        true
    }

    /// Whether the server reports more pages.
    fn has_next_page(&self) -> bool;

    /// Consumes the page, yielding its items.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Fetches all pages of an endpoint, concatenating their items.
///
/// `fetch_page` is called with page numbers starting at 1. The walk stops
/// when the has-next-page flag is absent or false, or on the first failed
/// or empty page. No page-count bound, no deduplication.
pub fn fetch_all<P, F>(endpoint: &str, mut fetch_page: F) -> Vec<P::Item>
where
    P: PageResponse,
    F: FnMut(u32) -> Result<P>,
{
    let mut items = Vec::new();
    let mut page = 1u32;
    loop {
        let response = match fetch_page(page) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    endpoint,
                    page,
                    error = %e,
                    "page fetch failed, keeping partial results"
                );
                break;
            },
        };
        if !response.succeeded() {
            tracing::warn!(endpoint, page, "page reported failure, keeping partial results");
            break;
        }
        let has_next = response.has_next_page();
        let page_items = response.into_items();
        if page_items.is_empty() {
            break;
        }
        items.extend(page_items);
        if !has_next {
            break;
        }
        page += 1;
    }
    items
}
