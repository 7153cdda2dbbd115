//! Entry points for consuming a page chain
//!
//! [`collect`] walks every page eagerly, [`iterate`] and [`iterable`] hand
//! out lazy cursors that fetch pages on demand.

use super::cursor::{PageCursor, PageIterable};
use super::types::Page;
use crate::error::Result;
use tracing::debug;

/// Upper bound on the up-front allocation taken from `total_count`
const MAX_PREALLOCATED_ITEMS: usize = 10_000;

/// Collect the items of `first` and all following pages into one `Vec`
///
/// A zero `total_count` returns immediately without reading `data` or
/// fetching. Any fetch error is returned and the items gathered so far are
/// dropped.
pub async fn collect<P: Page>(first: P) -> Result<Vec<P::Item>> {
    let total = first.total_count();
    if total == 0 {
        return Ok(Vec::new());
    }

    let capacity = usize::try_from(total)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOCATED_ITEMS);
    let mut all = Vec::with_capacity(capacity);

    let mut current = first;
    let mut pages = 1;
    while current.has_next() {
        let next = current.next_page().await?;
        all.extend(current.into_data());
        current = next;
        pages += 1;
    }
    all.extend(current.into_data());

    debug!("Collected {} items from {} pages", all.len(), pages);
    Ok(all)
}

/// Lazily iterate the items of `first` and all following pages
///
/// A zero `total_count` yields an exhausted cursor that never touches the page.
pub fn iterate<P: Page>(first: P) -> PageCursor<P> {
    if first.total_count() == 0 {
        return PageCursor::empty();
    }
    PageCursor::new(first)
}

/// Repeatable lazy view starting from `first`
///
/// Each traversal clones `first` and re-issues `next_page` calls, so
/// traversals agree only when the page source returns the same chain every
/// time.
pub fn iterable<P: Page + Clone>(first: &P) -> PageIterable<'_, P> {
    PageIterable::new(first)
}
