//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    /// Prefix of the document title, rendered as "{title_prefix} - {post title}"
    pub title_prefix: String,
    pub timezone: String,

    // Output
    pub public_dir: String,

    // Freshness of a fetched post, in seconds
    pub revalidate_secs: u64,

    // Comments
    pub comment_endpoint: String,
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub content: ContentConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Medium".to_string(),
            title_prefix: "Medium".to_string(),
            timezone: "UTC".to_string(),

            public_dir: "public".to_string(),

            revalidate_secs: 60,

            comment_endpoint: "http://localhost:3000/api/createComment".to_string(),
            request_timeout_secs: 10,

            content: ContentConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the rest of the crate cannot work with
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        if self.comment_endpoint.trim().is_empty() {
            anyhow::bail!("comment_endpoint must not be empty");
        }
        if self.content.fixtures.is_none()
            && (self.content.project_id.is_empty() || self.content.dataset.is_empty())
        {
            anyhow::bail!("content.project_id and content.dataset are required without fixtures");
        }
        Ok(())
    }

    /// Parsed display timezone
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|e| anyhow::anyhow!("unknown timezone `{}`: {}", self.timezone, e))
    }

    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Content store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    /// Serve posts from a local JSON file instead of the query API
    pub fixtures: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2021-10-21".to_string(),
            use_cdn: true,
            token: None,
            fixtures: None,
        }
    }
}
