//! Built-in spacetraveling templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off: view data is
//! escaped when it is built, and post bodies are trusted CMS HTML.

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Listing, PostDetail, PostSummary};
use crate::error::Result;
use crate::helpers::{html_escape, post_path, Helpers};

/// Header logo, served at `/images/logo.svg`
pub const LOGO_SVG: &str = include_str!("spacetraveling/logo.svg");

/// State of a post page while its content is being resolved
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Still loading: render a placeholder
    Pending,
    Found(PostDetail),
    NotFound,
}

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
    helpers: Helpers,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("loading.html", include_str!("spacetraveling/loading.html")),
            ("not_found.html", include_str!("spacetraveling/not_found.html")),
            ("error.html", include_str!("spacetraveling/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("spacetraveling/partials/header.html"),
            ),
            (
                "partials/post_list.html",
                include_str!("spacetraveling/partials/post_list.html"),
            ),
        ])?;

        Ok(Self {
            tera,
            site: SiteData {
                title: html_escape(&config.title),
                language: html_escape(&config.language),
            },
            helpers: Helpers::new(config),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    /// The listing page: the posts loaded so far and a load more control
    /// when a next page exists
    pub fn render_home(&self, listing: &Listing) -> Result<String> {
        let mut context = self.base_context();
        context.insert("posts", &self.post_cards(listing.posts()));
        context.insert(
            "next_page",
            &listing
                .next_page()
                .map(|cursor| html_escape(cursor.public().as_str())),
        );
        self.render("index.html", &context)
    }

    /// Just the post entries, to be appended to an existing listing
    pub fn render_post_list(&self, posts: &[PostSummary]) -> Result<String> {
        let mut context = Context::new();
        context.insert("posts", &self.post_cards(posts));
        self.render("partials/post_list.html", &context)
    }

    /// A post page in whatever state its lookup is in
    pub fn render_post(&self, resolution: &Resolution) -> Result<String> {
        match resolution {
            Resolution::Pending => self.render("loading.html", &self.base_context()),
            Resolution::NotFound => self.render_not_found(),
            Resolution::Found(post) => {
                let mut context = self.base_context();
                context.insert("post", &self.post_page(post));
                self.render("post.html", &context)
            }
        }
    }

    pub fn render_not_found(&self) -> Result<String> {
        self.render("not_found.html", &self.base_context())
    }

    /// An error page, optionally offering a link to retry
    pub fn render_error(&self, message: &str, retry: Option<&str>) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", &html_escape(message));
        context.insert("retry", &retry.map(html_escape));
        self.render("error.html", &context)
    }

    fn post_cards(&self, posts: &[PostSummary]) -> Vec<PostCardData> {
        posts
            .iter()
            .map(|post| PostCardData {
                path: post
                    .slug
                    .as_deref()
                    .map(|slug| html_escape(&post_path(slug)))
                    .unwrap_or_else(|| "/".to_string()),
                title: html_escape(&post.title),
                subtitle: html_escape(&post.subtitle),
                author: html_escape(&post.author),
                date: html_escape(&self.helpers.date(post.first_publication_date.as_ref())),
                datetime: post
                    .first_publication_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn post_page(&self, post: &PostDetail) -> PostPageData {
        PostPageData {
            title: html_escape(&post.title),
            author: html_escape(&post.author),
            date: html_escape(&self.helpers.date(post.first_publication_date.as_ref())),
            datetime: post
                .first_publication_date
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
            reading_time: post.reading_time(),
            banner: post.banner.as_ref().map(|b| html_escape(&b.url)),
            banner_alt: post
                .banner
                .as_ref()
                .and_then(|b| b.alt.as_deref())
                .map(html_escape)
                .unwrap_or_else(|| html_escape(&post.title)),
            sections: post
                .content
                .iter()
                .map(|section| SectionData {
                    heading: section
                        .heading
                        .as_deref()
                        .filter(|h| !h.is_empty())
                        .map(html_escape),
                    html: section.body.as_html(),
                })
                .collect(),
        }
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCardData {
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
    pub reading_time: usize,
    pub banner: Option<String>,
    pub banner_alt: String,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: Option<String>,
    /// Trusted HTML from the rich text converter
    pub html: String,
}
