//! Turns a post view into HTML

use chrono_tz::Tz;
use tera::Context;

use super::PostView;
use crate::config::SiteConfig;
use crate::content::PortableTextRenderer;
use crate::error::{Error, Result};
use crate::helpers::{
    date_xml, html_escape, locale_string, meta_generator, open_graph, post_path,
    text_with_breaks, ImageUrlBuilder,
};
use crate::templates::{CommentData, FormData, PostData, SiteData, TemplateRenderer};

/// Explicit settings the page needs to render
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub site_title: String,
    pub title_prefix: String,
    pub timezone: Tz,
    pub images: ImageUrlBuilder,
}

impl RenderSettings {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let timezone = config.tz().map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            site_title: config.title.clone(),
            title_prefix: config.title_prefix.clone(),
            timezone,
            images: ImageUrlBuilder::from_config(&config.content),
        })
    }
}

/// Renders post pages and the not-found page
pub struct PageRenderer {
    templates: TemplateRenderer,
    body: PortableTextRenderer,
    settings: RenderSettings,
}

impl PageRenderer {
    pub fn new(settings: RenderSettings) -> Result<Self> {
        Ok(Self {
            templates: TemplateRenderer::new()?,
            body: PortableTextRenderer::new(settings.images.clone()),
            settings,
        })
    }

    pub fn render_post(&self, view: &PostView) -> Result<String> {
        let post = view.post();
        let images = &self.settings.images;

        let main_image = post.main_image.as_ref().and_then(|i| images.url_for(i));
        let author_image = post.author.image.as_ref().and_then(|i| images.url_for(i));

        let post_data = PostData {
            title: html_escape(&post.title),
            description: html_escape(&post.description),
            author_name: html_escape(&post.author.name),
            author_image: author_image.as_deref().map(html_escape),
            main_image: main_image.as_deref().map(html_escape),
            published_at: locale_string(&post.created_at, &self.settings.timezone),
            published_iso: date_xml(&post.created_at),
            body_html: self.body.render(&post.body),
            og_tags: open_graph(
                &post.title,
                main_image.as_deref(),
                &self.settings.site_title,
            ),
            comments: post
                .comments
                .iter()
                .map(|c| CommentData {
                    id: html_escape(&c.id),
                    name: html_escape(&c.name),
                    text: text_with_breaks(&c.comment),
                })
                .collect(),
        };

        let state = view.state();
        let form = view.form();
        let form_data = FormData {
            visible: state.shows_form(),
            submitting: state.is_submitting(),
            action: post_path(post.slug()),
            name: html_escape(&form.name),
            email: html_escape(&form.email),
            comment: html_escape(&form.comment),
            errors: view
                .errors()
                .messages()
                .into_iter()
                .map(str::to_string)
                .collect(),
            failure: view.failure().map(html_escape),
        };

        let mut context = self.base_context();
        context.insert("post", &post_data);
        context.insert("form", &form_data);

        self.templates.render("post.html", &context)
    }

    pub fn render_not_found(&self) -> Result<String> {
        self.templates.render("not_found.html", &self.base_context())
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: html_escape(&self.settings.site_title),
                title_prefix: html_escape(&self.settings.title_prefix),
                generator: meta_generator(),
            },
        );
        context
    }
}
