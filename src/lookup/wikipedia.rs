//! Wikipedia client on the MediaWiki action API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{status_error, Encyclopedia, LookupError};
use crate::config::LookupConfig;
use crate::models::Page;

#[derive(Debug, Clone)]
pub struct WikipediaClient {
    api_url: String,
    client: Client,
}

impl WikipediaClient {
    /// Create with explicit configuration. `api_url` is the `api.php`
    /// endpoint of a wiki, e.g. `https://en.wikipedia.org/w/api.php`.
    pub fn new(
        api_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_url: api_url.into(),
            client,
        })
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Self::new(
            config.wikipedia_api_url(),
            &config.user_agent,
            config.timeout(),
        )
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn get_page(&self, query: &str) -> Result<Option<Page>, LookupError> {
        tracing::debug!(query, "querying Wikipedia");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "extracts|info"),
                ("inprop", "url"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsectionformat", "wiki"),
                ("redirects", "1"),
                ("titles", query),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: QueryResponse = response.json().await?;
        Ok(body.into_page())
    }
}

// ============================================================
// Wire format (formatversion=2)
// ============================================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
}

impl QueryResponse {
    fn into_page(self) -> Option<Page> {
        let page = self.query?.pages.into_iter().next()?;
        if page.missing || page.invalid {
            return None;
        }
        Some(Page {
            summary: page.extract.unwrap_or_default(),
            full_url: page.fullurl.unwrap_or_default(),
            title: page.title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> Option<Page> {
        serde_json::from_str::<QueryResponse>(json)
            .unwrap()
            .into_page()
    }

    #[test]
    fn existing_page_carries_extract_and_url() {
        let page = page(
            r#"{"batchcomplete":true,"query":{"pages":[{"pageid":1525,"ns":0,
            "title":"Aspirin","extract":"Aspirin is a drug.",
            "fullurl":"https://en.wikipedia.org/wiki/Aspirin"}]}}"#,
        )
        .unwrap();
        assert_eq!(page.title, "Aspirin");
        assert_eq!(page.summary, "Aspirin is a drug.");
        assert_eq!(page.full_url, "https://en.wikipedia.org/wiki/Aspirin");
    }

    #[test]
    fn missing_page_is_none() {
        assert!(page(
            r#"{"batchcomplete":true,"query":{"pages":[{"ns":0,"title":"Xyzzy","missing":true}]}}"#
        )
        .is_none());
    }

    #[test]
    fn invalid_title_is_none() {
        assert!(page(
            r#"{"query":{"pages":[{"title":"C[","invalidreason":"bad","invalid":true}]}}"#
        )
        .is_none());
    }

    #[test]
    fn response_without_query_is_none() {
        assert!(page(r#"{"batchcomplete":true}"#).is_none());
    }
}
