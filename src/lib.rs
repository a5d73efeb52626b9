//! blogpost-rs: server-rendered blog post pages
//!
//! Posts come from a headless content store, are rendered from portable text
//! with Tera templates, and accept reader comments that are forwarded to an
//! external comment endpoint.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod submit;
pub mod templates;
pub mod view;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use content::{ContentLoader, ContentStore, FixtureStore, SanityStore};
use submit::{CommentSink, HttpCommentSink};
use view::{PageRenderer, RenderSettings};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new instance from a directory containing `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::warn!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// The configured content store
    pub fn store(&self) -> Result<Arc<dyn ContentStore>> {
        let content = &self.config.content;
        match &content.fixtures {
            Some(path) => {
                let path = self.base_dir.join(path);
                Ok(Arc::new(FixtureStore::load(path)?))
            }
            None => Ok(Arc::new(SanityStore::new(
                content,
                self.config.request_timeout(),
            )?)),
        }
    }

    pub fn loader(&self) -> Result<ContentLoader> {
        Ok(ContentLoader::new(self.store()?, self.config.revalidate()))
    }

    pub fn renderer(&self) -> Result<PageRenderer> {
        let settings = RenderSettings::from_config(&self.config)?;
        Ok(PageRenderer::new(settings)?)
    }

    pub fn sink(&self) -> Result<Arc<dyn CommentSink>> {
        Ok(Arc::new(HttpCommentSink::new(
            &self.config.comment_endpoint,
            self.config.request_timeout(),
        )?))
    }

    /// Write every known post to the public directory
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
