//! Content loader - resolves slugs to posts through the revalidation cache

use std::sync::Arc;
use std::time::Duration;

use super::{ContentStore, Post};
use crate::cache::{Lookup, PageCache};
use crate::error::{Error, Result};

/// Loads posts from a content store, keeping each fresh for a fixed window
#[derive(Clone)]
pub struct ContentLoader {
    store: Arc<dyn ContentStore>,
    cache: Arc<PageCache>,
}

impl ContentLoader {
    pub fn new(store: Arc<dyn ContentStore>, revalidate: Duration) -> Self {
        Self {
            store,
            cache: Arc::new(PageCache::new(revalidate)),
        }
    }

    /// Slugs of every known post
    pub async fn known_slugs(&self) -> Result<Vec<String>> {
        self.store.list_slugs().await
    }

    /// Resolve one post
    ///
    /// Fresh entries are served from the cache. Stale entries are served as
    /// they are while one background refresh runs. Slugs never seen before are
    /// fetched before returning.
    pub async fn load(&self, slug: &str) -> Result<Arc<Post>> {
        match self.cache.get(slug).await {
            Lookup::Fresh(post) => Ok(post),
            Lookup::Stale(post) => {
                self.spawn_refresh(slug);
                Ok(post)
            }
            Lookup::Miss => self.fetch(slug).await,
        }
    }

    /// Fetch every known post into the cache, skipping ones that fail
    pub async fn prerender(&self) -> Result<usize> {
        let slugs = self.known_slugs().await?;
        let mut loaded = 0;

        for slug in &slugs {
            match self.fetch(slug).await {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!("Failed to pre-render {}: {}", slug, e),
            }
        }

        tracing::info!("Pre-rendered {} of {} posts", loaded, slugs.len());
        Ok(loaded)
    }

    /// Fetch from the store, update the cache and report missing posts
    async fn fetch(&self, slug: &str) -> Result<Arc<Post>> {
        match self.store.fetch_post(slug).await? {
            Some(post) => {
                let post = Arc::new(post);
                self.cache.insert(post.clone()).await;
                Ok(post)
            }
            None => {
                self.cache.remove(slug).await;
                Err(Error::NotFound(slug.to_string()))
            }
        }
    }

    fn spawn_refresh(&self, slug: &str) {
        if !self.cache.begin_refresh(slug) {
            return;
        }

        let loader = self.clone();
        let slug = slug.to_string();
        tokio::spawn(async move {
            tracing::debug!("Revalidating {}", slug);
            match loader.fetch(&slug).await {
                Ok(_) => tracing::debug!("Revalidated {}", slug),
                Err(Error::NotFound(_)) => tracing::info!("Post {} no longer exists", slug),
                Err(e) => tracing::warn!("Failed to revalidate {}: {}", slug, e),
            }
            loader.cache.end_refresh(&slug);
        });
    }
}
