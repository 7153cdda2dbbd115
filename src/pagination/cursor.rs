//! Lazy, forward-only traversal of a page chain
//!
//! The cursor owns one page at a time and an index into its items. The
//! next page is requested only when an item beyond the current page is asked
//! for, never ahead of time.

use super::types::Page;
use crate::error::Result;
use futures::stream::{self, Stream};
use std::fmt;
use tracing::debug;

/// Pull-based cursor over every item of a page chain
pub struct PageCursor<P> {
    /// Page currently being read; `None` for an empty result set
    current: Option<P>,
    /// Index of the next unread item in `current`
    position: usize,
    /// Number of `next_page` calls made so far
    pages_fetched: usize,
}

impl<P: Page> PageCursor<P> {
    /// Create a cursor positioned at the first item of `first`
    pub fn new(first: P) -> Self {
        Self {
            current: Some(first),
            position: 0,
            pages_fetched: 0,
        }
    }

    /// Create an already exhausted cursor
    pub fn empty() -> Self {
        Self {
            current: None,
            position: 0,
            pages_fetched: 0,
        }
    }

    /// Check whether more items may be available
    ///
    /// Never fetches. True while the current page has unread items or reports
    /// a next page.
    pub fn has_more(&self) -> bool {
        match &self.current {
            Some(page) => self.position < page.data().len() || page.has_next(),
            None => false,
        }
    }

    /// Number of pages fetched beyond the first one
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Produce the next item, fetching the following page if the current one is used up
    ///
    /// Returns `None` once the chain is exhausted. A failed fetch is returned
    /// as `Some(Err(_))` and leaves the cursor on the page it was reading.
    pub async fn advance(&mut self) -> Option<Result<P::Item>> {
        loop {
            let page = self.current.as_ref()?;

            if let Some(item) = page.data().get(self.position) {
                self.position += 1;
                return Some(Ok(item.clone()));
            }

            if !page.has_next() {
                return None;
            }

            debug!("Fetching page {} of result set", self.pages_fetched + 2);
            let next = match page.next_page().await {
                Ok(next) => next,
                Err(e) => return Some(Err(e)),
            };
            self.pages_fetched += 1;
            self.current = Some(next);
            self.position = 0;
        }
    }

    /// Turn the cursor into a stream of items
    ///
    /// The stream ends after the last item or right after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<P::Item>> {
        stream::unfold(Some(self), |state| async move {
            let mut cursor = state?;
            match cursor.advance().await? {
                Ok(item) => Some((Ok(item), Some(cursor))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}

impl<P> fmt::Debug for PageCursor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCursor")
            .field("empty_result_set", &self.current.is_none())
            .field("position", &self.position)
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}

/// Repeatable view over a page chain
///
/// Every [`cursor`](Self::cursor) call starts over from a clone of the same
/// first page, so each traversal issues its own `next_page` calls.
#[derive(Debug)]
pub struct PageIterable<'a, P> {
    first: &'a P,
}

impl<'a, P: Page + Clone> PageIterable<'a, P> {
    pub(crate) fn new(first: &'a P) -> Self {
        Self { first }
    }

    /// Start a fresh traversal from the first page
    pub fn cursor(&self) -> PageCursor<P> {
        super::iterate(self.first.clone())
    }

    /// Start a fresh traversal as a stream
    pub fn stream(&self) -> impl Stream<Item = Result<P::Item>> {
        self.cursor().into_stream()
    }
}
