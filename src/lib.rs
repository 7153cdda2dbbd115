//! # vzaar
//!
//! Async Rust client for the vzaar video hosting API.
//!
//! ## Features
//!
//! - **Authenticated REST client**: Client id and auth token headers, retries with backoff,
//!   optional client-side rate limiting
//! - **Resources**: Typed request builders over API paths with GET/POST/PATCH/DELETE
//! - **Pagination**: Eager collection of every page, or lazy item-by-item traversal that
//!   fetches the next page only when needed
//! - **Settings**: YAML files and `VZAAR_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vzaar::{ClientSettings, VideoListParams, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ClientSettings::from_env().build_client()?;
//!
//!     // First page only
//!     let page = client.list_videos(&VideoListParams::new().per_page(50)).await?;
//!
//!     // Walk every video, fetching pages as they are reached
//!     let mut videos = page.iter_lazy();
//!     while let Some(video) = videos.advance().await {
//!         println!("{}", video?.id);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │   models: Video, VideoListParams, VideoUpdate              │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────┬─────┴──────────────┬────────────────┐
//! │ resource::Resource   │ resource::         │ pagination     │
//! │ path + query + verbs │ ResourcePage (Page)│ collect/iterate│
//! └──────────────────────┴─────┬──────────────┴────────────────┘
//!                              │
//! ┌────────────────────────────┴───────────────────────────────┐
//! │ http::RestClient  credentials, retry, backoff, rate limit  │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// API credentials
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Page traversal
pub mod pagination;

/// Resource request builders and list pages
pub mod resource;

/// API data types
pub mod models;

/// Client settings from YAML and the environment
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use auth::Credentials;
pub use config::ClientSettings;
pub use http::{RestClient, RestClientConfig};
pub use models::{Video, VideoListParams, VideoState, VideoUpdate};
pub use pagination::{collect, iterable, iterate, Page, PageCursor};
pub use resource::{Resource, ResourcePage, ResourcePath};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
