//! Request builder for a single API resource

use super::page::{DataEnvelope, ResourcePage};
use super::params::to_query_pairs;
use crate::error::{Error, Result};
use crate::http::RestClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::marker::PhantomData;
use url::Url;

/// Types that live under a fixed path of the API
pub trait ResourcePath {
    /// Path relative to the API root, e.g. `"videos"`
    const PATH: &'static str;
}

/// A request against one resource path, yielding `T`
///
/// Built from a [`RestClient`], extended with path segments and query
/// parameters, then executed with one of the verb methods.
///
/// ```rust,ignore
/// let video: Video = client.resource::<Video>().id(42).get().await?;
/// ```
pub struct Resource<T> {
    client: RestClient,
    segments: Vec<String>,
    query: BTreeMap<String, String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Resource<T> {
    pub(crate) fn new(client: RestClient, path: &str) -> Self {
        Self {
            client,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            query: BTreeMap::new(),
            _marker: PhantomData,
        }
    }

    /// Address a single object by id
    #[must_use]
    pub fn id(self, id: impl Display) -> Self {
        self.segment(id.to_string())
    }

    /// Append a path segment
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Add every set field of a parameter struct as a query parameter
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self> {
        for (key, value) in to_query_pairs(params)? {
            self.query.insert(key, value);
        }
        Ok(self)
    }

    /// Path relative to the API root
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Absolute URL including query parameters
    pub fn uri(&self) -> Result<Url> {
        let mut url = self.client.endpoint().clone();
        url.path_segments_mut()
            .map_err(|()| Error::config("endpoint cannot carry a path"))?
            .pop_if_empty()
            .extend(&self.segments);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

impl<T: DeserializeOwned> Resource<T> {
    /// GET the resource
    pub async fn get(&self) -> Result<T> {
        let envelope: DataEnvelope<T> = self.client.get(self.uri()?.as_str()).await?;
        Ok(envelope.data)
    }

    /// POST a new object to the resource
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        let envelope: DataEnvelope<T> = self.client.post(self.uri()?.as_str(), body).await?;
        Ok(envelope.data)
    }

    /// PATCH the resource
    pub async fn update<B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        let envelope: DataEnvelope<T> = self.client.patch(self.uri()?.as_str(), body).await?;
        Ok(envelope.data)
    }

    /// DELETE the resource
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(self.uri()?.as_str()).await
    }
}

impl<T: DeserializeOwned + Clone + Send + Sync> Resource<T> {
    /// GET the first page of a list endpoint
    pub async fn list(&self) -> Result<ResourcePage<T>> {
        ResourcePage::fetch(&self.client, self.uri()?.as_str()).await
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            segments: self.segments.clone(),
            query: self.query.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path())
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
