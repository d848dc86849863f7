//! Plone `@search` client.
//!
//! Each page is requested as
//! `GET <endpoint>?portal_type=<T>&fullobjects=1&b_start=<cursor>` with an
//! `Accept: application/json` header. The next cursor is the `b_start`
//! query parameter of the response's `batching.next` link.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use popit_core::{Cursor, EntityFetcher, FetchError, Page, Settings};

/// Fetcher for a Plone REST API search endpoint.
#[derive(Clone)]
pub struct PloneFetcher {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    batching: Option<Batching>,
}

#[derive(Deserialize)]
struct Batching {
    #[serde(default)]
    next: Option<String>,
}

impl PloneFetcher {
    /// Create a fetcher for `endpoint` whose requests give up after `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport {
                url: endpoint.to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Create a fetcher from the API endpoint and timeout in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        Self::new(&settings.api_endpoint, settings.fetch_timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EntityFetcher for PloneFetcher {
    async fn fetch(&self, selector: &str, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
        let b_start = cursor.map(Cursor::as_str).unwrap_or("0");
        let url = format!("{}?portal_type={}&fullobjects=1&b_start={}", self.endpoint, selector, b_start);
        info!(url = %url, "Fetching page");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("portal_type", selector), ("fullobjects", "1"), ("b_start", b_start)])
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: Box::new(e),
            })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            source: Box::new(e),
        })?;
        let page = parse_page(&body).map_err(|reason| FetchError::Decode { url, reason })?;
        debug!(items = page.items.len(), next = ?page.next, "Page decoded");
        Ok(page)
    }
}

/// Decode a search response body into a [`Page`].
fn parse_page(body: &str) -> Result<Page, String> {
    let page: SearchPage = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let next = match page.batching.and_then(|b| b.next) {
        Some(link) => Some(next_cursor(&link)?),
        None => None,
    };
    Ok(Page {
        items: page.items,
        next,
    })
}

fn next_cursor(link: &str) -> Result<Cursor, String> {
    let url = Url::parse(link).map_err(|e| format!("invalid batching link '{}': {}", link, e))?;
    url.query_pairs()
        .find(|(key, _)| key == "b_start")
        .map(|(_, value)| Cursor::new(value.into_owned()))
        .ok_or_else(|| format!("batching link '{}' has no b_start", link))
}
