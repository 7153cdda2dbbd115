//! API models
//!
//! Data types exchanged with the API and the shortcuts for reaching them.

mod video;

pub use video::{Video, VideoListParams, VideoState, VideoUpdate};

use crate::error::Result;
use crate::http::RestClient;
use crate::resource::{Resource, ResourcePage};

impl RestClient {
    /// Resource for the account's videos
    pub fn videos(&self) -> Resource<Video> {
        self.resource::<Video>()
    }

    /// Fetch one video by id
    pub async fn video(&self, id: u64) -> Result<Video> {
        self.videos().id(id).get().await
    }

    /// Fetch the first page of videos matching `params`
    pub async fn list_videos(&self, params: &VideoListParams) -> Result<ResourcePage<Video>> {
        self.videos().params(params)?.list().await
    }

    /// Apply an update to a video
    pub async fn update_video(&self, id: u64, update: &VideoUpdate) -> Result<Video> {
        self.videos().id(id).update(update).await
    }

    /// Delete a video
    pub async fn delete_video(&self, id: u64) -> Result<()> {
        self.videos().id(id).delete().await
    }
}
