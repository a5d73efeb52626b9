//! Embedded page templates using the Tera template engine
//!
//! Templates are compiled into the binary. Autoescaping is off: every value
//! placed in a context is escaped (or rendered as trusted markup) by the view
//! before it gets here.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;

/// Template renderer with the embedded page templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("page/layout.html")),
            ("post.html", include_str!("page/post.html")),
            ("not_found.html", include_str!("page/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("page/partials/header.html"),
            ),
            (
                "partials/comment_form.html",
                include_str!("page/partials/comment_form.html"),
            ),
            (
                "partials/thank_you.html",
                include_str!("page/partials/thank_you.html"),
            ),
            (
                "partials/comments.html",
                include_str!("page/partials/comments.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

// Template context data; string fields hold HTML-safe text

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub title_prefix: String,
    pub generator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub description: String,
    pub author_name: String,
    pub author_image: Option<String>,
    pub main_image: Option<String>,
    pub published_at: String,
    pub published_iso: String,
    pub body_html: String,
    pub og_tags: String,
    pub comments: Vec<CommentData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentData {
    pub id: String,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormData {
    /// False once the comment was accepted
    pub visible: bool,
    pub submitting: bool,
    pub action: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub errors: Vec<String>,
    pub failure: Option<String>,
}
