//! Error types shared by the content source, content model and renderer

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while fetching, validating or rendering blog content
#[derive(Error, Debug)]
pub enum Error {
    /// The content source has no entry for the requested slug
    #[error("No post found for slug '{slug}'")]
    NotFound { slug: String },

    /// Transport failure talking to the content source
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The content source answered with a non-success status
    #[error("Content source returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// A document is missing fields it cannot be rendered without
    #[error("Malformed content: {reason}")]
    MalformedContent { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            reason: reason.into(),
        }
    }

    /// Whether the error came from talking to the content source
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Status { .. })
    }
}
