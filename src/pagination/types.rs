//! Pagination types and traits
//!
//! Defines the page capability consumed by the collector and the cursor.

use crate::error::Result;
use async_trait::async_trait;

/// One chunk of a larger result set, plus what is needed to fetch the next chunk
///
/// Implemented per page source. The REST implementation is
/// [`ResourcePage`](crate::resource::ResourcePage); tests use in-memory chains.
///
/// Contract:
/// - `data()` may be empty but is always present
/// - `total_count()` is the same on every page of one chain
/// - `has_next()` is false exactly when `next_page()` would be invalid
/// - `next_page()` must not be called when `has_next()` is false; what
///   happens then is up to the implementation (the REST page fails with
///   [`Error::MissingPageLink`](crate::Error::MissingPageLink))
#[async_trait]
pub trait Page: Sized + Send + Sync {
    /// Item type carried by the page
    type Item: Clone + Send;

    /// Items on this page, in order
    fn data(&self) -> &[Self::Item];

    /// Total number of items across all pages
    fn total_count(&self) -> u64;

    /// Whether a following page exists
    fn has_next(&self) -> bool;

    /// Fetch the following page
    async fn next_page(&self) -> Result<Self>;

    /// Consume the page, returning its items
    fn into_data(self) -> Vec<Self::Item> {
        self.data().to_vec()
    }
}
