//! Forwarding reader comments to the external comment endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// A validated comment, encoded as the endpoint expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInput {
    /// Id of the post being commented on
    #[serde(rename = "_id")]
    pub post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
}

/// Destination for new comments
#[async_trait]
pub trait CommentSink: Send + Sync {
    async fn submit(&self, input: &CommentInput) -> Result<()>;
}

/// Posts comments as JSON to a fixed URL
pub struct HttpCommentSink {
    client: Client,
    endpoint: String,
}

impl HttpCommentSink {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl CommentSink for HttpCommentSink {
    async fn submit(&self, input: &CommentInput) -> Result<()> {
        tracing::info!(post_id = %input.post_id, "Submitting comment to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(input)
            .send()
            .await
            .map_err(|e| Error::Submission(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Submission(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
