//! In-memory content store loaded from a JSON file
//!
//! The file holds an array of post documents in the same shape the query API
//! returns, with every comment attached. Unapproved comments are filtered out
//! on fetch, matching the query contract of the HTTP store.

use async_trait::async_trait;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{ContentStore, Post};
use crate::error::{Error, Result};

pub struct FixtureStore {
    posts: Vec<Post>,
}

impl FixtureStore {
    /// Build from documents, rejecting duplicate slugs
    pub fn from_posts(posts: Vec<Post>) -> Result<Self> {
        let mut seen = HashSet::new();
        for post in &posts {
            if !seen.insert(post.slug()) {
                return Err(Error::Config(format!(
                    "duplicate slug `{}` in fixtures",
                    post.slug()
                )));
            }
        }
        Ok(Self { posts })
    }

    /// Load documents from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let posts: Vec<Post> = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "invalid fixtures file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        tracing::info!("Loaded {} posts from {:?}", posts.len(), path.as_ref());
        Self::from_posts(posts)
    }
}

#[async_trait]
impl ContentStore for FixtureStore {
    async fn list_slugs(&self) -> Result<Vec<String>> {
        Ok(self.posts.iter().map(|p| p.slug().to_string()).collect())
    }

    async fn fetch_post(&self, slug: &str) -> Result<Option<Post>> {
        Ok(self.posts.iter().find(|p| p.slug() == slug).map(|p| {
            let mut post = p.clone();
            post.comments.retain(|c| c.approved);
            post
        }))
    }
}
