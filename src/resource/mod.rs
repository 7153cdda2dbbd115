//! REST resource layer
//!
//! # Overview
//!
//! - [`Resource`] - request builder for one resource path (segments, query
//!   parameters, GET/POST/PATCH/DELETE)
//! - [`ResourcePage`] - one page of a list endpoint; implements
//!   [`Page`](crate::pagination::Page) by following the `next` link
//! - [`ResourcePath`] - maps a model type to its API path

mod page;
mod params;
mod types;

pub use page::{PageLinks, PageMeta, ResourcePage};
pub use params::to_query_pairs;
pub use types::{Resource, ResourcePath};
