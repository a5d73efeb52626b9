//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text and keep its line breaks
pub fn text_with_breaks(s: &str) -> String {
    html_escape(s).replace('\n', "<br/>")
}

/// Generate Open Graph meta tags for an article
///
/// The description is left to the page body so it appears once per page.
pub fn open_graph(title: &str, image: Option<&str>, site_name: &str) -> String {
    let mut tags = vec![
        r#"<meta property="og:type" content="article">"#.to_string(),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(title)
        ),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(site_name)
        ),
    ];

    if let Some(img) = image {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            html_escape(img)
        ));
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="blogpost-rs {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}
