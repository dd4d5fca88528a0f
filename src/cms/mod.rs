//! Content source seam: the headless CMS the blog reads from

mod document;
mod prismic;

#[cfg(test)]
pub(crate) mod memory;

pub use document::{Cursor, Document, SearchPage};
pub use prismic::PrismicClient;

use async_trait::async_trait;

use crate::error::Result;

/// A query for every document of one custom type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeQuery {
    pub document_type: String,
    /// Fields to return, e.g. `posts.title`; empty selects everything
    pub fields: Vec<String>,
    pub page_size: usize,
}

impl TypeQuery {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            fields: Vec::new(),
            page_size: 20,
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Read access to the CMS.
///
/// Every call returns an explicit result; nothing is retried or cached.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page of documents of a type
    async fn get_by_type(&self, query: &TypeQuery) -> Result<SearchPage>;

    /// The page a cursor points at
    async fn get_next_page(&self, cursor: &Cursor) -> Result<SearchPage>;

    /// The document of a type with the given uid, if any
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>>;
}
