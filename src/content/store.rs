//! Content store interface

use async_trait::async_trait;

use super::Post;
use crate::error::Result;

/// Read access to the headless content store
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Slugs of every existing post
    async fn list_slugs(&self) -> Result<Vec<String>>;

    /// One post with its author and approved comments, or `None` if the slug
    /// matches nothing
    async fn fetch_post(&self, slug: &str) -> Result<Option<Post>>;
}
