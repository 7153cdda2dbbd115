//! Pages returned by list endpoints
//!
//! A list response looks like:
//!
//! ```json
//! {
//!   "data": [ ... ],
//!   "meta": {
//!     "total_count": 42,
//!     "links": { "first": "...", "next": "...", "previous": null, "last": "..." }
//!   }
//! }
//! ```

use crate::error::{Error, Result};
use crate::http::RestClient;
use crate::pagination::{self, Page, PageCursor};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Navigation links of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}

/// Page metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub links: PageLinks,
}

/// Wire shape of a list response
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct PageEnvelope<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Wire shape of a single-object response
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// One page of a list endpoint, able to fetch its neighbours
#[derive(Debug, Clone)]
pub struct ResourcePage<T> {
    data: Vec<T>,
    meta: PageMeta,
    client: RestClient,
}

impl<T> ResourcePage<T> {
    pub(crate) fn from_envelope(envelope: PageEnvelope<T>, client: RestClient) -> Self {
        Self {
            data: envelope.data,
            meta: envelope.meta,
            client,
        }
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn links(&self) -> &PageLinks {
        &self.meta.links
    }

    pub fn items(&self) -> &[T] {
        &self.data
    }

    pub fn has_previous(&self) -> bool {
        self.meta.links.previous.is_some()
    }
}

impl<T: DeserializeOwned + Clone + Send + Sync> ResourcePage<T> {
    /// GET a page by URL
    pub(crate) async fn fetch(client: &RestClient, url: &str) -> Result<Self> {
        let envelope: PageEnvelope<T> = client.get(url).await?;
        debug!(
            "Fetched page with {} of {} items",
            envelope.data.len(),
            envelope.meta.total_count
        );
        Ok(Self::from_envelope(envelope, client.clone()))
    }

    async fn follow(&self, rel: &str, link: Option<&str>) -> Result<Self> {
        let url = link.ok_or_else(|| Error::missing_link(rel))?;
        Self::fetch(&self.client, url).await
    }

    /// Fetch the previous page
    pub async fn previous_page(&self) -> Result<Self> {
        self.follow("previous", self.meta.links.previous.as_deref()).await
    }

    /// Fetch the first page of the result set
    pub async fn first_page(&self) -> Result<Self> {
        self.follow("first", self.meta.links.first.as_deref()).await
    }

    /// Fetch the last page of the result set
    pub async fn last_page(&self) -> Result<Self> {
        self.follow("last", self.meta.links.last.as_deref()).await
    }

    /// Gather this page and every following page
    pub async fn collect_all(self) -> Result<Vec<T>> {
        pagination::collect(self).await
    }

    /// Lazily walk this page and every following page
    pub fn iter_lazy(self) -> PageCursor<Self> {
        pagination::iterate(self)
    }
}

#[async_trait]
impl<T: DeserializeOwned + Clone + Send + Sync> Page for ResourcePage<T> {
    type Item = T;

    fn data(&self) -> &[T] {
        &self.data
    }

    fn total_count(&self) -> u64 {
        self.meta.total_count
    }

    fn has_next(&self) -> bool {
        self.meta.links.next.is_some()
    }

    async fn next_page(&self) -> Result<Self> {
        self.follow("next", self.meta.links.next.as_deref()).await
    }

    fn into_data(self) -> Vec<T> {
        self.data
    }
}
