//! Generator module - exports the site as static HTML using the built-in templates

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::cms::TypeQuery;
use crate::error::Error;
use crate::templates::{Resolution, TemplateRenderer, LOGO_SVG};
use crate::Blog;

/// Summary of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Posts shown on the exported listing
    pub listed: usize,
    /// Post pages written ahead of time
    pub prerendered: Vec<String>,
}

/// Static exporter
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;
        Ok(Self { blog, renderer })
    }

    /// Export the listing, the first posts, the 404 page and the logo
    pub async fn generate(&self) -> Result<GenerateReport> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;

        let listed = self.generate_index().await?;
        let prerendered = self.generate_post_pages().await?;

        write_file(&public_dir.join("404.html"), &self.renderer.render_not_found()?)?;
        write_file(&public_dir.join("images/logo.svg"), LOGO_SVG)?;

        Ok(GenerateReport {
            listed,
            prerendered,
        })
    }

    /// Write the first listing page; further pages are loaded on demand
    async fn generate_index(&self) -> Result<usize> {
        let listing = self.blog.load_listing().await?;
        let html = self.renderer.render_home(&listing)?;
        write_file(&self.blog.public_dir.join("index.html"), &html)?;
        Ok(listing.posts().len())
    }

    /// Write the pages of the first `cms.prerender` posts
    async fn generate_post_pages(&self) -> Result<Vec<String>> {
        let cms = &self.blog.config.cms;
        if cms.prerender == 0 {
            return Ok(Vec::new());
        }

        let query = TypeQuery::new(&cms.document_type)
            .fields([format!("{}.uid", cms.document_type)])
            .page_size(cms.prerender);
        let page = self.blog.source().get_by_type(&query).await?;

        let mut written = Vec::new();
        for slug in page.results.iter().filter_map(|doc| doc.uid.as_deref()) {
            let post = match self.blog.load_post(slug).await {
                Ok(post) => post,
                Err(e @ (Error::NotFound { .. } | Error::MalformedContent { .. })) => {
                    tracing::warn!("Skipping post {}: {}", slug, e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let html = self.renderer.render_post(&Resolution::Found(post))?;
            write_file(
                &self.blog.public_dir.join("post").join(slug).join("index.html"),
                &html,
            )?;
            written.push(slug.to_string());
        }

        Ok(written)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}
