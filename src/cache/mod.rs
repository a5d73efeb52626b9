//! Revalidation cache for fetched posts
//!
//! A fetched post stays fresh for the revalidation window. After that it is
//! still served, but the next lookup reports it as stale so the caller can
//! refresh it in the background. At most one refresh per slug is in flight.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::content::Post;

/// A cached post and when it was fetched
#[derive(Debug, Clone)]
struct CacheEntry {
    post: Arc<Post>,
    fetched_at: Instant,
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Inside the revalidation window
    Fresh(Arc<Post>),
    /// Past the window; serve it and refresh
    Stale(Arc<Post>),
    /// Never fetched (or evicted)
    Miss,
}

/// Per-slug post cache with a fixed revalidation window
#[derive(Debug)]
pub struct PageCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    refreshing: Mutex<HashSet<String>>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            refreshing: Mutex::new(HashSet::new()),
        }
    }

    pub async fn get(&self, slug: &str) -> Lookup {
        let entries = self.entries.read().await;
        match entries.get(slug) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                Lookup::Fresh(entry.post.clone())
            }
            Some(entry) => Lookup::Stale(entry.post.clone()),
            None => Lookup::Miss,
        }
    }

    /// Store a freshly fetched post and restart its window
    pub async fn insert(&self, post: Arc<Post>) {
        let slug = post.slug().to_string();
        let entry = CacheEntry {
            post,
            fetched_at: Instant::now(),
        };
        self.entries.write().await.insert(slug, entry);
    }

    pub async fn remove(&self, slug: &str) {
        self.entries.write().await.remove(slug);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Claim the refresh of `slug`; false if another refresh holds it
    pub fn begin_refresh(&self, slug: &str) -> bool {
        self.refreshing().insert(slug.to_string())
    }

    pub fn end_refresh(&self, slug: &str) {
        self.refreshing().remove(slug);
    }

    /// The in-flight set; a panic elsewhere must not stop revalidation
    fn refreshing(&self) -> MutexGuard<'_, HashSet<String>> {
        self.refreshing.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Refresh set was poisoned, recovering");
            self.refreshing.clear_poison();
            poisoned.into_inner()
        })
    }
}
