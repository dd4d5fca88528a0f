//! Post models, validated from raw CMS documents

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::reading_time;
use super::richtext::RichText;
use crate::cms::Document;
use crate::error::{Error, Result};
use crate::helpers::parse_timestamp;

/// A post as shown on the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Slug (the document uid)
    pub slug: Option<String>,

    /// First publication date
    pub first_publication_date: Option<DateTime<FixedOffset>>,

    /// Plain-text title
    pub title: String,

    pub subtitle: String,

    pub author: String,
}

/// Banner image of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    pub alt: Option<String>,
}

/// A titled section of a post body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentSection {
    pub heading: Option<String>,
    pub body: RichText,
}

/// A full post as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub slug: Option<String>,

    pub first_publication_date: Option<DateTime<FixedOffset>>,

    pub last_publication_date: Option<DateTime<FixedOffset>>,

    /// Plain-text title
    pub title: String,

    pub subtitle: String,

    pub author: String,

    pub banner: Option<Banner>,

    /// Body sections in document order
    pub content: Vec<ContentSection>,
}

/// A text field that may be stored as a plain key text or as rich text
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextField {
    Plain(String),
    Rich(RichText),
}

impl TextField {
    fn into_text(self) -> String {
        match self {
            TextField::Plain(text) => text,
            TextField::Rich(rich) => rich.as_text(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBanner {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    alt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    body: Option<RichText>,
}

#[derive(Debug, Deserialize)]
struct PostFields {
    #[serde(default)]
    title: Option<TextField>,
    #[serde(default)]
    subtitle: Option<TextField>,
    #[serde(default)]
    author: Option<TextField>,
    #[serde(default)]
    banner: Option<RawBanner>,
    #[serde(default)]
    content: Option<Vec<RawSection>>,
}

impl PostFields {
    fn from_document(doc: &Document) -> Result<Self> {
        let data = doc
            .data
            .clone()
            .ok_or_else(|| Error::malformed(format!("document {} has no data", doc.id)))?;
        serde_json::from_value(data)
            .map_err(|e| Error::malformed(format!("document {}: {}", doc.id, e)))
    }

    fn take_title(&mut self, doc: &Document) -> Result<String> {
        self.title
            .take()
            .map(TextField::into_text)
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| Error::malformed(format!("document {} has no title", doc.id)))
    }
}

fn optional_text(field: Option<TextField>) -> String {
    field.map(TextField::into_text).unwrap_or_default()
}

fn parse_date(doc: &Document, raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let raw = raw?;
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::warn!("Ignoring unparsable date {:?} on document {}", raw, doc.id);
    }
    parsed
}

impl PostSummary {
    /// Validate a listing document
    pub fn from_document(doc: &Document) -> Result<Self> {
        let mut fields = PostFields::from_document(doc)?;
        let title = fields.take_title(doc)?;

        Ok(Self {
            slug: doc.uid.clone(),
            first_publication_date: parse_date(doc, doc.first_publication_date.as_deref()),
            title,
            subtitle: optional_text(fields.subtitle),
            author: optional_text(fields.author),
        })
    }

    /// Validate a page of listing documents, skipping malformed ones
    pub fn from_documents(docs: &[Document]) -> Vec<Self> {
        docs.iter()
            .filter_map(|doc| match Self::from_document(doc) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!("Skipping post {}: {}", doc.id, e);
                    None
                }
            })
            .collect()
    }
}

impl PostDetail {
    /// Validate a single post document
    pub fn from_document(doc: &Document) -> Result<Self> {
        let mut fields = PostFields::from_document(doc)?;
        let title = fields.take_title(doc)?;

        let banner = fields.banner.and_then(|banner| {
            banner
                .url
                .filter(|url| !url.trim().is_empty())
                .map(|url| Banner {
                    url,
                    alt: banner.alt,
                })
        });

        let content = fields
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|section| ContentSection {
                heading: section.heading,
                body: section.body.unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            slug: doc.uid.clone(),
            first_publication_date: parse_date(doc, doc.first_publication_date.as_deref()),
            last_publication_date: parse_date(doc, doc.last_publication_date.as_deref()),
            title,
            subtitle: optional_text(fields.subtitle),
            author: optional_text(fields.author),
            banner,
            content,
        })
    }

    /// Total words counted towards the reading time
    pub fn word_count(&self) -> usize {
        reading_time::word_count(&self.content)
    }

    /// Estimated reading time in minutes
    pub fn reading_time(&self) -> usize {
        reading_time::reading_time(&self.content)
    }
}
