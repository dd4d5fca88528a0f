//! Listing pagination and single post loading

use super::post::{PostDetail, PostSummary};
use crate::cms::{ContentSource, Cursor, TypeQuery};
use crate::error::{Error, Result};
use crate::helpers::is_valid_slug;

/// The posts displayed so far and the cursor of the next page.
///
/// Posts keep fetch order; nothing is sorted or deduplicated, so a source
/// returning overlapping pages shows the overlap twice.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    posts: Vec<PostSummary>,
    next_page: Option<Cursor>,
}

impl Listing {
    /// Fetch the first page of posts
    pub async fn load_initial<S: ContentSource + ?Sized>(
        source: &S,
        query: &TypeQuery,
    ) -> Result<Self> {
        let page = source.get_by_type(query).await?;
        let posts = PostSummary::from_documents(&page.results);
        tracing::debug!(
            "Loaded {} posts (more: {})",
            posts.len(),
            page.next_page.is_some()
        );

        Ok(Self {
            posts,
            next_page: page.next_page,
        })
    }

    /// Resume a listing at a cursor, with nothing displayed yet
    pub fn from_cursor(cursor: Cursor) -> Self {
        Self {
            posts: Vec::new(),
            next_page: Some(cursor),
        }
    }

    /// Fetch the next page and append it.
    ///
    /// Returns the number of posts appended; without a cursor this is a
    /// no-op returning 0. On error the listing is left untouched.
    pub async fn load_more<S: ContentSource + ?Sized>(&mut self, source: &S) -> Result<usize> {
        let Some(cursor) = &self.next_page else {
            return Ok(0);
        };

        let page = source.get_next_page(cursor).await?;
        let posts = PostSummary::from_documents(&page.results);
        let added = posts.len();

        self.posts.extend(posts);
        self.next_page = page.next_page;
        tracing::debug!("Appended {} posts (more: {})", added, self.has_more());

        Ok(added)
    }

    /// Keep loading until the source runs out of pages
    pub async fn load_all<S: ContentSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        while self.has_more() {
            self.load_more(source).await?;
        }
        Ok(())
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&Cursor> {
        self.next_page.as_ref()
    }

    /// Whether the "load more" control should be offered
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Load a single post by slug
pub async fn load_detail<S: ContentSource + ?Sized>(
    source: &S,
    document_type: &str,
    slug: &str,
) -> Result<PostDetail> {
    if !is_valid_slug(slug) {
        return Err(Error::NotFound {
            slug: slug.to_string(),
        });
    }

    let doc = source
        .get_by_uid(document_type, slug)
        .await?
        .ok_or_else(|| Error::NotFound {
            slug: slug.to_string(),
        })?;

    PostDetail::from_document(&doc)
}
