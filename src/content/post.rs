//! Post and Comment models, as delivered by the content store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::portable_text::Block;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Document id
    #[serde(rename = "_id")]
    pub id: String,

    /// Creation timestamp
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,

    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    pub slug: Slug,

    pub author: Author,

    /// Rich-text body
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Vec<Block>,

    #[serde(rename = "mainImage", default)]
    pub main_image: Option<ImageRef>,

    /// Comments attached to this post, in store order
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.slug.current
    }
}

/// Projections return `null` for absent fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// URL-safe post identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// An image field: either an asset reference or an already resolved URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub asset: ImageAsset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A reader comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Reference to the owning post
    #[serde(default)]
    pub post: Option<Reference>,

    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    pub comment: String,

    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub id: String,
}
