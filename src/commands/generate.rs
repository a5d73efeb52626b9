//! Export every known post as static HTML

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::ContentLoader;
use crate::error::Error;
use crate::helpers::encode_segment;
use crate::view::{PageRenderer, PostView};
use crate::Blog;

/// Generate pages for the configured store
pub async fn run(blog: &Blog) -> Result<()> {
    let loader = blog.loader()?;
    let renderer = blog.renderer()?;
    let written = export(&loader, &renderer, &blog.public_dir).await?;
    println!("Generated {} pages in {:?}", written, blog.public_dir);
    Ok(())
}

/// Render each known slug to `<public>/post/<slug>/index.html`, plus `404.html`
///
/// A slug that no longer resolves is skipped; any other failure aborts.
pub async fn export(loader: &ContentLoader, renderer: &PageRenderer, public_dir: &Path) -> Result<usize> {
    let start = std::time::Instant::now();
    fs::create_dir_all(public_dir)?;

    let slugs = loader.known_slugs().await?;
    tracing::info!("Exporting {} posts", slugs.len());

    let mut written = 0;
    for slug in &slugs {
        let post = match loader.load(slug).await {
            Ok(post) => post,
            Err(Error::NotFound(_)) => {
                tracing::warn!("Skipping {}: listed but not found", slug);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let Some(output_path) = post_output_path(public_dir, slug) else {
            tracing::warn!("Skipping {:?}: not usable as a file name", slug);
            continue;
        };
        let html = renderer.render_post(&PostView::new(post))?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, &html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated post: {:?}", output_path);
        written += 1;
    }

    fs::write(public_dir.join("404.html"), renderer.render_not_found()?)?;

    tracing::info!(
        "Exported {} posts in {:.2}s",
        written,
        start.elapsed().as_secs_f64()
    );
    Ok(written)
}

/// `None` for slugs that would escape the post directory
fn post_output_path(public_dir: &Path, slug: &str) -> Option<PathBuf> {
    let segment = encode_segment(slug);
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(public_dir.join("post").join(segment).join("index.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::tests::post;
    use crate::content::FixtureStore;
    use crate::helpers::ImageUrlBuilder;
    use crate::view::RenderSettings;
    use std::sync::Arc;
    use std::time::Duration;

    fn renderer() -> PageRenderer {
        PageRenderer::new(RenderSettings {
            site_title: "Medium".to_string(),
            title_prefix: "Medium".to_string(),
            timezone: chrono_tz::UTC,
            images: ImageUrlBuilder::new("abc123", "production"),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_export_writes_each_post() {
        let store = FixtureStore::from_posts(vec![
            post("hello-world", "Hello World"),
            post("second", "Second Post"),
        ])
        .unwrap();
        let loader = ContentLoader::new(Arc::new(store), Duration::from_secs(60));
        let dir = tempfile::tempdir().unwrap();

        let written = export(&loader, &renderer(), dir.path()).await.unwrap();
        assert_eq!(written, 2);

        let hello = fs::read_to_string(dir.path().join("post/hello-world/index.html")).unwrap();
        assert!(hello.contains("<title>Medium - Hello World</title>"));
        assert!(dir.path().join("post/second/index.html").exists());
        assert!(dir.path().join("404.html").exists());
    }

    #[tokio::test]
    async fn test_export_empty_store() {
        let store = FixtureStore::from_posts(Vec::new()).unwrap();
        let loader = ContentLoader::new(Arc::new(store), Duration::from_secs(60));
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(export(&loader, &renderer(), dir.path()).await.unwrap(), 0);
        assert!(dir.path().join("404.html").exists());
    }

    #[test]
    fn test_post_output_path_encodes_slug() {
        let path = post_output_path(Path::new("/public"), "../etc");
        assert_eq!(path, Some(PathBuf::from("/public/post/..%2Fetc/index.html")));
        assert_eq!(post_output_path(Path::new("/public"), ".."), None);
    }
}
