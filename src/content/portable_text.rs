//! Portable text: block model and HTML rendering

use serde::{Deserialize, Serialize};

use super::post::ImageAsset;
use crate::helpers::{html_escape, is_safe_href, text_with_breaks, ImageUrlBuilder};

/// A top-level body block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    /// Custom block types this renderer does not know about
    #[serde(other)]
    Unknown,
}

/// A paragraph, heading, quote or list item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(rename = "listItem", default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<MarkDef>,
}

/// A run of text sharing the same marks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    /// Decorator names or keys into the block's mark definitions
    #[serde(default)]
    pub marks: Vec<String>,
}

/// An annotation referenced from span marks, e.g. a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub asset: ImageAsset,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListTag {
    Ul,
    Ol,
}

impl ListTag {
    fn from_item(kind: &str) -> Self {
        if kind == "number" {
            ListTag::Ol
        } else {
            ListTag::Ul
        }
    }

    fn name(self) -> &'static str {
        match self {
            ListTag::Ul => "ul",
            ListTag::Ol => "ol",
        }
    }

    fn item_class(self) -> &'static str {
        match self {
            ListTag::Ul => "ml-4 list-disc",
            ListTag::Ol => "ml-4 list-decimal",
        }
    }
}

/// Renders portable text blocks to HTML
pub struct PortableTextRenderer {
    images: ImageUrlBuilder,
}

impl PortableTextRenderer {
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self { images }
    }

    /// Render a body to HTML
    pub fn render(&self, blocks: &[Block]) -> String {
        let mut html = String::new();
        // Open lists, innermost last; each has exactly one open <li>
        let mut lists: Vec<(ListTag, u32)> = Vec::new();

        for block in blocks {
            match block {
                Block::Text(text) => match text.list_item.as_deref() {
                    Some(kind) => {
                        let tag = ListTag::from_item(kind);
                        let level = text.level.unwrap_or(1).max(1);
                        open_list_item(&mut html, &mut lists, tag, level);
                        html.push_str(&render_spans(text));
                    }
                    None => {
                        close_lists(&mut html, &mut lists, 0);
                        html.push_str(&render_text_block(text));
                    }
                },
                Block::Image(image) => {
                    close_lists(&mut html, &mut lists, 0);
                    html.push_str(&self.render_image(image));
                }
                Block::Unknown => {
                    tracing::debug!("Skipping unsupported portable text block");
                }
            }
        }

        close_lists(&mut html, &mut lists, 0);
        html
    }

    fn render_image(&self, image: &ImageBlock) -> String {
        let url = match &image.asset.url {
            Some(url) => Some(url.clone()),
            None => image
                .asset
                .reference
                .as_deref()
                .and_then(|r| self.images.url_for_ref(r)),
        };

        match url {
            Some(url) => format!(
                r#"<figure class="my-5"><img src="{}" alt="{}"/></figure>"#,
                html_escape(&url),
                html_escape(image.alt.as_deref().unwrap_or(""))
            ),
            None => {
                tracing::debug!("Skipping image block without a resolvable asset");
                String::new()
            }
        }
    }
}

/// Write a `<li>` at `level`, opening or closing lists as needed
fn open_list_item(html: &mut String, lists: &mut Vec<(ListTag, u32)>, tag: ListTag, level: u32) {
    close_lists(html, lists, level);

    match lists.last() {
        Some(&(open_tag, open_level)) if open_level == level && open_tag == tag => {
            html.push_str("</li>");
        }
        Some(&(_, open_level)) if open_level == level => {
            close_lists(html, lists, level - 1);
            push_list(html, lists, tag, level);
        }
        _ => push_list(html, lists, tag, level),
    }

    html.push_str(&format!(r#"<li class="{}">"#, tag.item_class()));
}

fn push_list(html: &mut String, lists: &mut Vec<(ListTag, u32)>, tag: ListTag, level: u32) {
    html.push_str(&format!("<{}>", tag.name()));
    lists.push((tag, level));
}

/// Close every open list deeper than `level`
fn close_lists(html: &mut String, lists: &mut Vec<(ListTag, u32)>, level: u32) {
    while let Some(&(tag, open_level)) = lists.last() {
        if open_level <= level {
            break;
        }
        html.push_str(&format!("</li></{}>", tag.name()));
        lists.pop();
    }
}

fn render_text_block(block: &TextBlock) -> String {
    let inner = render_spans(block);
    match block.style.as_deref().unwrap_or("normal") {
        "h1" => format!(r#"<h1 class="text-2xl font-bold my-5">{}</h1>"#, inner),
        "h2" => format!(r#"<h2 class="text-xl font-bold my-5">{}</h2>"#, inner),
        "h3" => format!(r#"<h3 class="text-lg font-bold my-5">{}</h3>"#, inner),
        style @ ("h4" | "h5" | "h6") => format!("<{style}>{inner}</{style}>"),
        "blockquote" => format!("<blockquote>{}</blockquote>", inner),
        _ => format!("<p>{}</p>", inner),
    }
}

fn render_spans(block: &TextBlock) -> String {
    let mut html = String::new();

    for span in &block.children {
        let mut open = String::new();
        let mut close: Vec<String> = Vec::new();

        for mark in &span.marks {
            let tags = match mark.as_str() {
                "strong" => Some(("<strong>".to_string(), "</strong>")),
                "em" => Some(("<em>".to_string(), "</em>")),
                "code" => Some(("<code>".to_string(), "</code>")),
                "underline" => Some((r#"<span class="underline">"#.to_string(), "</span>")),
                "strike-through" => Some(("<del>".to_string(), "</del>")),
                key => link_open_tag(block, key).map(|tag| (tag, "</a>")),
            };

            if let Some((open_tag, close_tag)) = tags {
                open.push_str(&open_tag);
                close.push(close_tag.to_string());
            }
        }

        html.push_str(&open);
        html.push_str(&text_with_breaks(&span.text));
        for tag in close.iter().rev() {
            html.push_str(tag);
        }
    }

    html
}

/// Links other than web, mail and relative targets render as plain text
fn link_open_tag(block: &TextBlock, key: &str) -> Option<String> {
    let def = block.mark_defs.iter().find(|d| d.key == key)?;
    if def.kind != "link" {
        return None;
    }
    let href = def.href.as_deref().filter(|h| is_safe_href(h))?;
    Some(format!(
        r#"<a href="{}" class="text-blue-500 hover:underline">"#,
        html_escape(href)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PortableTextRenderer {
        PortableTextRenderer::new(ImageUrlBuilder::new("abc123", "production"))
    }

    fn parse(json: &str) -> Vec<Block> {
        serde_json::from_str(json).unwrap()
    }

    fn text(style: &str, s: &str) -> Block {
        Block::Text(TextBlock {
            style: Some(style.to_string()),
            children: vec![Span {
                text: s.to_string(),
                marks: Vec::new(),
            }],
            ..Default::default()
        })
    }

    fn item(kind: &str, level: u32, s: &str) -> Block {
        Block::Text(TextBlock {
            style: Some("normal".to_string()),
            list_item: Some(kind.to_string()),
            level: Some(level),
            children: vec![Span {
                text: s.to_string(),
                marks: Vec::new(),
            }],
            ..Default::default()
        })
    }

    #[test]
    fn test_headings_keep_their_level() {
        let html = renderer().render(&[text("h1", "One"), text("h2", "Two"), text("h3", "Three")]);
        assert!(html.contains(r#"<h1 class="text-2xl font-bold my-5">One</h1>"#));
        assert!(html.contains(r#"<h2 class="text-xl font-bold my-5">Two</h2>"#));
        assert!(html.contains(r#"<h3 class="text-lg font-bold my-5">Three</h3>"#));
    }

    #[test]
    fn test_paragraph_and_quote() {
        let html = renderer().render(&[text("normal", "Hi <there>"), text("blockquote", "Q")]);
        assert_eq!(html, "<p>Hi &lt;there&gt;</p><blockquote>Q</blockquote>");
    }

    #[test]
    fn test_bullet_items_grouped() {
        let html = renderer().render(&[
            item("bullet", 1, "a"),
            item("bullet", 1, "b"),
            text("normal", "after"),
        ]);
        assert_eq!(
            html,
            r#"<ul><li class="ml-4 list-disc">a</li><li class="ml-4 list-disc">b</li></ul><p>after</p>"#
        );
    }

    #[test]
    fn test_nested_and_switching_lists() {
        let html = renderer().render(&[
            item("bullet", 1, "a"),
            item("bullet", 2, "a.1"),
            item("bullet", 1, "b"),
            item("number", 1, "one"),
        ]);
        assert_eq!(
            html,
            concat!(
                r#"<ul><li class="ml-4 list-disc">a"#,
                r#"<ul><li class="ml-4 list-disc">a.1</li></ul>"#,
                r#"</li><li class="ml-4 list-disc">b</li></ul>"#,
                r#"<ol><li class="ml-4 list-decimal">one</li></ol>"#
            )
        );
    }

    #[test]
    fn test_marks_and_links() {
        let blocks = parse(
            r#"[{
                "_type": "block",
                "_key": "k1",
                "style": "normal",
                "markDefs": [
                    { "_key": "lnk", "_type": "link", "href": "https://example.com/?a=1&b=2" },
                    { "_key": "bad", "_type": "link", "href": "javascript:alert(1)" }
                ],
                "children": [
                    { "_type": "span", "text": "Bold", "marks": ["strong"] },
                    { "_type": "span", "text": " and ", "marks": [] },
                    { "_type": "span", "text": "link", "marks": ["lnk", "em"] },
                    { "_type": "span", "text": " unsafe", "marks": ["bad"] }
                ]
            }]"#,
        );
        let html = renderer().render(&blocks);
        assert_eq!(
            html,
            concat!(
                "<p><strong>Bold</strong> and ",
                r#"<a href="https://example.com/?a=1&amp;b=2" class="text-blue-500 hover:underline"><em>link</em></a>"#,
                " unsafe</p>"
            )
        );
    }

    #[test]
    fn test_image_and_unknown_blocks() {
        let blocks = parse(
            r#"[
                { "_type": "image", "asset": { "_ref": "image-xyz-10x20-png" }, "alt": "pic" },
                { "_type": "youtube", "url": "https://youtu.be/x" },
                { "_type": "image", "asset": { "_ref": "not-an-image" } }
            ]"#,
        );
        assert_eq!(blocks[1], Block::Unknown);
        let html = renderer().render(&blocks);
        assert_eq!(
            html,
            r#"<figure class="my-5"><img src="https://cdn.sanity.io/images/abc123/production/xyz-10x20.png" alt="pic"/></figure>"#
        );
    }
}
