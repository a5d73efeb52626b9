//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::ContentConfig;
use crate::content::ImageRef;

/// Characters escaped in a single path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Image CDN host
const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

/// Path of a post page
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/post/hello-world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/post/{}", encode_segment(slug))
}

/// Encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Whether a link target is safe to render as an anchor
pub fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with('#')
}

/// Builds CDN URLs for image asset references
///
/// Project and dataset are explicit so rendering never depends on process
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    pub fn from_config(content: &ContentConfig) -> Self {
        Self::new(&content.project_id, &content.dataset)
    }

    /// Resolve an image field to a URL, if it carries enough information
    pub fn url_for(&self, image: &ImageRef) -> Option<String> {
        if let Some(url) = &image.asset.url {
            return Some(url.clone());
        }
        image
            .asset
            .reference
            .as_deref()
            .and_then(|r| self.url_for_ref(r))
    }

    /// Convert an asset id like `image-<id>-<w>x<h>-<format>` to its CDN URL
    pub fn url_for_ref(&self, reference: &str) -> Option<String> {
        if self.project_id.is_empty() {
            return None;
        }
        let rest = reference.strip_prefix("image-")?;
        let (id_and_dims, format) = rest.rsplit_once('-')?;
        let (id, dims) = id_and_dims.rsplit_once('-')?;
        let (w, h) = dims.split_once('x')?;
        if id.is_empty()
            || format.is_empty()
            || w.parse::<u32>().is_err()
            || h.parse::<u32>().is_err()
        {
            return None;
        }
        Some(format!(
            "{}/{}/{}/{}-{}.{}",
            IMAGE_CDN, self.project_id, self.dataset, id, dims, format
        ))
    }
}
