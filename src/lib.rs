//! spacetraveling: a server-rendered blog front-end for a Prismic repository
//!
//! Posts are listed page by page from the CMS, rendered with embedded Tera
//! templates, and served by an axum server or exported as static files.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cms::{ContentSource, PrismicClient, TypeQuery};
use content::{Listing, PostDetail};

/// The blog application: configuration plus the content source it reads from
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (export) directory
    pub public_dir: PathBuf,
    source: Arc<dyn ContentSource>,
}

impl Blog {
    /// Create a blog from a directory, reading `_config.yml` when present and
    /// the CMS credentials from the environment
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        let client = PrismicClient::new(&config.cms)?;
        Ok(Self::with_source(config, base_dir, Arc::new(client)))
    }

    /// Create a blog around an explicit content source
    pub fn with_source(
        config: config::SiteConfig,
        base_dir: PathBuf,
        source: Arc<dyn ContentSource>,
    ) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
            source,
        }
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.source.as_ref()
    }

    /// Query for the first page of the listing
    pub fn listing_query(&self) -> TypeQuery {
        TypeQuery::new(&self.config.cms.document_type)
            .fields(self.config.cms.listing_fields())
            .page_size(self.config.cms.page_size)
    }

    /// Load the first page of the listing
    pub async fn load_listing(&self) -> Result<Listing> {
        Listing::load_initial(self.source(), &self.listing_query()).await
    }

    /// Load a single post by slug
    pub async fn load_post(&self, slug: &str) -> Result<PostDetail> {
        content::load_detail(self.source(), &self.config.cms.document_type, slug).await
    }

    /// Export the site to the public directory
    pub async fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self).await
    }

    /// Remove the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}
