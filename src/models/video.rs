//! Video resource

use crate::resource::ResourcePath;
use crate::types::SortOrder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoState {
    /// Upload received, encoding in progress
    #[default]
    Processing,
    /// Encoded and playable
    Ready,
    /// Encoding failed
    Failed,
    /// Source file being replaced
    Replacing,
    /// Removed from the account
    Deleted,
    /// A state this SDK does not know about
    #[serde(other)]
    Unknown,
}

/// A video hosted on the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "private")]
    pub is_private: bool,
    #[serde(default)]
    pub seo_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub state: VideoState,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub embed_code: Option<String>,
}

impl ResourcePath for Video {
    const PATH: &'static str = "videos";
}

/// Query parameters for listing videos
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Field to sort by, e.g. `created_at`
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    /// Free-text search
    pub q: Option<String>,
}

impl VideoListParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }
}

/// Editable fields of a video; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "private", skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_url: Option<String>,
}

impl VideoUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
