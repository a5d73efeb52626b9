//! Content store backed by the Sanity query HTTP API

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{ContentStore, Post};
use crate::config::ContentConfig;
use crate::error::{Error, Result};

/// Every post's slug
const SLUGS_QUERY: &str = r#"*[_type == "post" && defined(slug.current)].slug.current"#;

/// One post by slug, with its author and approved comments
const POST_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  _id,
  _createdAt,
  title,
  description,
  slug,
  author -> {
    name,
    image
  },
  "comments": *[
    _type == "comment" &&
    post._ref == ^._id &&
    approved == true
  ] | order(_createdAt asc),
  mainImage,
  body
}"#;

/// Response envelope of the query endpoint
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// HTTP client for a single project and dataset
pub struct SanityStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl SanityStore {
    pub fn new(config: &ContentConfig, timeout: Duration) -> Result<Self> {
        if config.project_id.is_empty() {
            return Err(Error::Config("content.project_id is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(
            client,
            &query_endpoint(config),
            config.token.clone(),
        ))
    }

    /// A store querying `endpoint` through an existing client
    pub fn with_client(client: Client, endpoint: &str, token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            token,
        }
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, params: &[(&str, String)]) -> Result<T> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            let encoded = serde_json::to_string(value)
                .map_err(|e| Error::Store(format!("failed to encode ${}: {}", name, e)))?;
            pairs.push((format!("${}", name), encoded));
        }

        let mut request = self.client.get(&self.endpoint).query(&pairs);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Store(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Store(format!("query returned {}: {}", status, body)));
        }

        let envelope = response
            .json::<QueryResponse<T>>()
            .await
            .map_err(|e| Error::Store(format!("failed to decode response: {}", e)))?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn list_slugs(&self) -> Result<Vec<String>> {
        let slugs: Vec<String> = self.query(SLUGS_QUERY, &[]).await?;
        tracing::debug!("Store returned {} slugs", slugs.len());
        Ok(slugs)
    }

    async fn fetch_post(&self, slug: &str) -> Result<Option<Post>> {
        let post: Option<Post> = self
            .query(POST_QUERY, &[("slug", slug.to_string())])
            .await?;
        tracing::debug!(slug, found = post.is_some(), "Fetched post");
        Ok(post)
    }
}

/// Query URL for the configured project, dataset and API version
fn query_endpoint(config: &ContentConfig) -> String {
    let host = if config.use_cdn && config.token.is_none() {
        "apicdn.sanity.io"
    } else {
        "api.sanity.io"
    };
    format!(
        "https://{}.{}/v{}/data/query/{}",
        config.project_id,
        host,
        config.api_version.trim_start_matches('v'),
        config.dataset
    )
}
