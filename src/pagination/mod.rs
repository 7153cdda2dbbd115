//! Pagination module
//!
//! Consumes chains of pages returned by list endpoints.
//!
//! # Overview
//!
//! - [`Page`] - capability trait every page source implements
//! - [`collect`] - eagerly gather every item of every page
//! - [`iterate`] / [`PageCursor`] - lazy, forward-only traversal that fetches
//!   the next page only when an item from it is requested
//! - [`iterable`] - repeatable lazy view over the same first page

mod cursor;
mod pages;
mod types;

pub use cursor::{PageCursor, PageIterable};
pub use pages::{collect, iterable, iterate};
pub use types::Page;
