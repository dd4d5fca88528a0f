//! Wire shapes of the Prismic REST API

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque reference to the next page of a search (the API's `next_page` URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The cursor without its `access_token` parameter, for handing to browsers.
    /// The client adds the token back when the cursor is followed.
    pub fn public(&self) -> Cursor {
        let Ok(mut url) = reqwest::Url::parse(&self.0) else {
            return self.clone();
        };
        if !url.query_pairs().any(|(key, _)| key == "access_token") {
            return self.clone();
        }

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "access_token")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        Cursor(url.into())
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<Document>,
    #[serde(default, deserialize_with = "deserialize_cursor")]
    pub next_page: Option<Cursor>,
}

/// A CMS document; `data` is validated later into typed records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub document_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Null and empty `next_page` values both end pagination
fn deserialize_cursor<'de, D>(deserializer: D) -> Result<Option<Cursor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| !value.trim().is_empty())
        .map(Cursor::new))
}

/// API entry point response, listing the content refs
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

impl ApiInfo {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_page() {
        let json = r#"{
            "page": 1,
            "results_per_page": 1,
            "total_pages": 2,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?ref=X&page=2&pageSize=1",
            "prev_page": null,
            "results": [{
                "id": "YFx1",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "last_publication_date": "2021-03-15T19:25:28+0000",
                "data": {"title": "Como utilizar Hooks", "subtitle": "Pensando em sincronização", "author": "Joseph Oliveira"}
            }]
        }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(page.results[0].document_type, "posts");
        assert!(page.next_page.unwrap().as_str().contains("page=2"));
    }

    #[test]
    fn test_empty_next_page_ends_pagination() {
        let page: SearchPage = serde_json::from_str(r#"{"results": [], "next_page": ""}"#).unwrap();
        assert!(page.next_page.is_none());

        let page: SearchPage = serde_json::from_str(r#"{"results": [], "next_page": null}"#).unwrap();
        assert!(page.next_page.is_none());

        let page: SearchPage = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_public_cursor_drops_access_token() {
        let cursor = Cursor::new(
            "https://blog.cdn.prismic.io/api/v2/documents/search?ref=X&access_token=SECRET&page=2",
        );
        assert_eq!(
            cursor.public().as_str(),
            "https://blog.cdn.prismic.io/api/v2/documents/search?ref=X&page=2"
        );

        let only_token = Cursor::new("https://blog.cdn.prismic.io/api/v2?access_token=SECRET");
        assert_eq!(only_token.public().as_str(), "https://blog.cdn.prismic.io/api/v2");

        let plain = Cursor::new("https://blog.cdn.prismic.io/api/v2/documents/search?page=2");
        assert_eq!(plain.public(), plain);
    }

    #[test]
    fn test_master_ref() {
        let info: ApiInfo = serde_json::from_str(
            r#"{"refs": [
                {"id": "preview", "ref": "P1", "label": "Preview", "isMasterRef": false},
                {"id": "master", "ref": "M1", "label": "Master", "isMasterRef": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(info.master_ref(), Some("M1"));

        let info: ApiInfo = serde_json::from_str(r#"{"refs": []}"#).unwrap();
        assert_eq!(info.master_ref(), None);
    }
}
