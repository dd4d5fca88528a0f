//! In-memory content source used by the tests

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ContentSource, Cursor, Document, SearchPage, TypeQuery};
use crate::error::{Error, Result};

/// Serves pre-built pages; cursors are `page:<index>`
#[derive(Default)]
pub struct MemorySource {
    pages: Vec<Vec<Document>>,
    documents: Vec<Document>,
    fail_next_page: bool,
    pub calls: AtomicUsize,
}

impl MemorySource {
    /// Listing pages, each a batch of documents served in order
    pub fn with_pages(pages: Vec<Vec<Document>>) -> Self {
        let documents = pages.iter().flatten().cloned().collect();
        Self {
            pages,
            documents,
            ..Self::default()
        }
    }

    /// Documents reachable by uid; these win over listing documents
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        let listed = std::mem::replace(&mut self.documents, documents);
        self.documents.extend(listed);
        self
    }

    /// Make every cursor fetch fail with a 503
    pub fn failing_next_page(mut self) -> Self {
        self.fail_next_page = true;
        self
    }

    fn page(&self, index: usize) -> SearchPage {
        SearchPage {
            results: self.pages.get(index).cloned().unwrap_or_default(),
            next_page: (index + 1 < self.pages.len())
                .then(|| Cursor::new(format!("page:{}", index + 1))),
        }
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn get_by_type(&self, _query: &TypeQuery) -> Result<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.page(0))
    }

    async fn get_next_page(&self, cursor: &Cursor) -> Result<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_page {
            return Err(Error::Status {
                status: 503,
                url: cursor.to_string(),
            });
        }
        let index = cursor
            .as_str()
            .strip_prefix("page:")
            .and_then(|i| i.parse().ok())
            .ok_or_else(|| Error::malformed("unknown cursor"))?;
        Ok(self.page(index))
    }

    async fn get_by_uid(&self, _document_type: &str, uid: &str) -> Result<Option<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .documents
            .iter()
            .find(|d| d.uid.as_deref() == Some(uid))
            .cloned())
    }
}

/// A listing document as the API returns it with `fetch` applied
pub fn summary_doc(uid: &str, title: &str) -> Document {
    Document {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        document_type: "posts".to_string(),
        first_publication_date: Some("2021-03-25T12:00:00+0000".to_string()),
        last_publication_date: None,
        data: Some(json!({
            "title": [{"type": "heading1", "text": title, "spans": []}],
            "subtitle": format!("Sobre {}", title),
            "author": "Joseph Oliveira",
        })),
    }
}

/// `n` space separated words
pub fn words(n: usize) -> String {
    vec!["palavra"; n].join(" ")
}

/// A full post document with the given (heading, body words) sections
pub fn detail_doc(uid: &str, sections: &[(&str, usize)]) -> Document {
    let content: Vec<_> = sections
        .iter()
        .map(|(heading, body_words)| {
            json!({
                "heading": heading,
                "body": [{"type": "paragraph", "text": words(*body_words), "spans": []}],
            })
        })
        .collect();

    Document {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        document_type: "posts".to_string(),
        first_publication_date: Some("2021-03-25T12:00:00+0000".to_string()),
        last_publication_date: Some("2021-03-26T12:00:00+0000".to_string()),
        data: Some(json!({
            "title": [{"type": "heading1", "text": "Criando um app CRA do zero", "spans": []}],
            "subtitle": "Tudo sobre como criar a sua primeira aplicação",
            "author": "Danilo Vieira",
            "banner": {"url": "https://images.prismic.io/banner.png", "alt": null},
            "content": content,
        })),
    }
}
