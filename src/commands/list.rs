//! List known posts

use anyhow::Result;

use crate::helpers::post_path;
use crate::Blog;

/// Print every slug the content store knows about
pub async fn run(blog: &Blog) -> Result<()> {
    let loader = blog.loader()?;
    let slugs = loader.known_slugs().await?;

    println!("Posts ({}):", slugs.len());
    for slug in slugs {
        println!("  {} [{}]", slug, post_path(&slug));
    }

    Ok(())
}
