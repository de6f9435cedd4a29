//! Storage backends for posts and subscribers.
//!
//! Every backend implements [`PostStore`] and/or [`SubscriberStore`]; the
//! services hold them as an ordered chain, primary first.

mod local;
mod memory;
mod remote;

pub use local::{LocalStore, POSTS_KEY, SUBSCRIBERS_KEY};
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use crate::models::{Post, Subscriber};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Maximum number of related posts shown under a post.
pub const RELATED_LIMIT: usize = 3;

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Remote,
    Local,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store is not configured")]
    Unconfigured,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("record already exists")]
    Conflict,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError>;

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;

    /// Posts sharing at least one category with `post`, never `exclude_id`,
    /// at most `limit` of them.
    async fn related_posts(
        &self,
        post: &Post,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Post>, StoreError> {
        let posts = self.list_posts().await?;
        Ok(select_related(posts, post, exclude_id, limit))
    }
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the email is already present.
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), StoreError>;
}

pub fn select_related(
    posts: impl IntoIterator<Item = Post>,
    post: &Post,
    exclude_id: &str,
    limit: usize,
) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|candidate| candidate.id != exclude_id && candidate.id != post.id)
        .filter(|candidate| candidate.shares_category_with(post))
        .take(limit)
        .collect()
}
