//! HTTP client for the Prismic REST API (v2)

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::document::ApiInfo;
use super::{ContentSource, Cursor, Document, SearchPage, TypeQuery};
use crate::config::CmsConfig;
use crate::error::{Error, Result};

/// Prismic API client, built from the site configuration and passed
/// explicitly to whatever needs content
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl PrismicClient {
    /// Create a client for the configured repository endpoint
    pub fn new(config: &CmsConfig) -> Result<Self> {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Create a client reusing an existing HTTP client
    pub fn with_http(config: &CmsConfig, http: reqwest::Client) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(Error::Config(
                "cms.endpoint is not set (or PRISMIC_API_ENDPOINT)".to_string(),
            ));
        }
        let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid cms.endpoint: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone(),
        })
    }

    /// Fetch the ref of the currently published content
    pub async fn master_ref(&self) -> Result<String> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }

        let info: ApiInfo = self.get_json(url).await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or_else(|| Error::malformed("API response has no master ref"))
    }

    /// Build a documents search URL
    pub fn search_url(
        &self,
        master_ref: &str,
        predicates: &[String],
        fields: &[String],
        page_size: usize,
    ) -> Url {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().extend(["documents", "search"]);
            })
            .ok();

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", master_ref);
            if !predicates.is_empty() {
                query.append_pair("q", &format!("[{}]", predicates.join("")));
            }
            if !fields.is_empty() {
                query.append_pair("fetch", &fields.join(","));
            }
            query.append_pair("pageSize", &page_size.to_string());
            if let Some(token) = &self.access_token {
                query.append_pair("access_token", token);
            }
        }

        url
    }

    /// Resolve a cursor to a URL, adding the access token when it is missing.
    ///
    /// Cursors come back from browsers, so only URLs on the configured
    /// endpoint's origin are accepted.
    pub fn cursor_url(&self, cursor: &Cursor) -> Result<Url> {
        let mut url = Url::parse(cursor.as_str())
            .map_err(|e| Error::malformed(format!("invalid next page cursor: {}", e)))?;

        if url.origin() != self.endpoint.origin() {
            return Err(Error::malformed(
                "next page cursor does not point at the content source",
            ));
        }

        if let Some(token) = &self.access_token {
            let has_token = url.query_pairs().any(|(key, _)| key == "access_token");
            if !has_token {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}{}", url.host_str().unwrap_or(""), url.path());

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: format!("{}{}", url.host_str().unwrap_or(""), url.path()),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// `[at(document.type,"posts")]`
pub fn at_type(document_type: &str) -> String {
    format!(r#"[at(document.type,"{}")]"#, document_type)
}

/// `[at(my.posts.uid,"slug")]`
pub fn at_uid(document_type: &str, uid: &str) -> String {
    format!(
        r#"[at(my.{}.uid,"{}")]"#,
        document_type,
        uid.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn get_by_type(&self, query: &TypeQuery) -> Result<SearchPage> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(
            &master_ref,
            &[at_type(&query.document_type)],
            &query.fields,
            query.page_size,
        );
        self.get_json(url).await
    }

    async fn get_next_page(&self, cursor: &Cursor) -> Result<SearchPage> {
        let url = self.cursor_url(cursor)?;
        self.get_json(url).await
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(&master_ref, &[at_uid(document_type, uid)], &[], 1);
        let page: SearchPage = self.get_json(url).await?;
        Ok(page.results.into_iter().next())
    }
}
