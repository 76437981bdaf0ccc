use crate::types::{FeedEntry, FetchedFeed, Result, TranslatorError};
use async_trait::async_trait;
use feed_rs::parser;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Feed retrieval boundary. The sync engine only sees `(title, link)` pairs
/// plus the feed's own title and description.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed>;
}

/// HTTP implementation over `reqwest` + `feed-rs`. One attempt per call; the
/// sync engine treats any failure as a failed cycle rather than retrying.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("rss-translator/0.1")
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchFeed for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed> {
        debug!("Fetching feed: {}", url);

        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TranslatorError::FetchFailed(format!(
                "unsupported scheme '{}' in {}",
                parsed.scheme(),
                url
            )));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranslatorError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslatorError::FetchFailed(format!("HTTP {} from {}", status, url)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TranslatorError::FetchFailed(e.to_string()))?;

        let feed = parser::parse(body.as_ref())
            .map_err(|e| TranslatorError::FetchFailed(format!("failed to parse feed: {}", e)))?;

        let entries: Vec<FeedEntry> = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry.links.first()?.href.clone();
                let title = entry.title.map(|t| t.content)?;
                if title.is_empty() {
                    return None;
                }
                Some(FeedEntry { title, link })
            })
            .collect();

        info!("Fetched {} entries from {}", entries.len(), url);

        Ok(FetchedFeed {
            title: feed.title.map(|t| t.content),
            description: feed.description.map(|d| d.content),
            entries,
        })
    }
}
