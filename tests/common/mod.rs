//! Shared test doubles for the sync and summary integration tests.
#![allow(dead_code)] // not every test binary uses every double

use async_trait::async_trait;
use rss_translator::{
    ExtractContent, FeedEntry, FetchFeed, FetchedFeed, Result, SyncObserver, TranslationGateway,
    TranslatorError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Fetcher that always returns the same parsed feed.
pub struct StaticFetcher {
    feed: FetchedFeed,
}

impl StaticFetcher {
    pub fn new(entries: Vec<(&str, &str)>) -> Self {
        Self {
            feed: FetchedFeed {
                title: Some("Test Feed".to_string()),
                description: Some("Headlines for testing".to_string()),
                entries: entries
                    .into_iter()
                    .map(|(title, link)| FeedEntry {
                        title: title.to_string(),
                        link: link.to_string(),
                    })
                    .collect(),
            },
        }
    }
}

#[async_trait]
impl FetchFeed for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedFeed> {
        Ok(self.feed.clone())
    }
}

/// Fetcher that fails every call, simulating an unreachable feed.
pub struct FailingFetcher;

#[async_trait]
impl FetchFeed for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed> {
        Err(TranslatorError::FetchFailed(format!("{} unreachable", url)))
    }
}

/// Gateway double with scripted behavior and call counters.
pub struct ScriptedGateway {
    pub fail_translation: bool,
    pub fail_summarize: bool,
    pub summary_text: String,
    pub translate_calls: AtomicUsize,
    pub summarize_calls: AtomicUsize,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            fail_translation: false,
            fail_summarize: false,
            summary_text: "测试摘要".to_string(),
            translate_calls: AtomicUsize::new(0),
            summarize_calls: AtomicUsize::new(0),
        }
    }
}

impl ScriptedGateway {
    pub fn failing_translation() -> Self {
        Self {
            fail_translation: true,
            ..Self::default()
        }
    }

    pub fn failing_summarize() -> Self {
        Self {
            fail_summarize: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TranslationGateway for ScriptedGateway {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_translation {
            // Models the backend returning a malformed one-line response.
            return Err(TranslatorError::TranslationMismatch {
                expected: texts.len(),
                actual: 1,
            });
        }

        Ok(texts.iter().map(|text| format!("{} 译", text)).collect())
    }

    async fn summarize(&self, _title: &str, _content: &str) -> Result<String> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_summarize {
            return Err(TranslatorError::SummarizationFailed("backend down".to_string()));
        }

        Ok(self.summary_text.clone())
    }
}

/// Extractor double returning fixed content, or `None` to simulate an
/// unreachable article page.
pub struct StaticExtractor {
    content: Option<String>,
}

impl StaticExtractor {
    pub fn with_content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self { content: None }
    }
}

#[async_trait]
impl ExtractContent for StaticExtractor {
    async fn extract_text(&self, _url: &str) -> Option<String> {
        self.content.clone()
    }
}

/// Observer that records every status notification and log line.
#[derive(Default)]
pub struct CollectingObserver {
    pub statuses: Mutex<Vec<(String, bool)>>,
    pub logs: Mutex<Vec<String>>,
}

impl SyncObserver for CollectingObserver {
    fn on_status(&self, status: &str, is_error: bool) {
        self.statuses.lock().unwrap().push((status.to_string(), is_error));
    }

    fn on_log(&self, line: &str) {
        self.logs.lock().unwrap().push(line.to_string());
    }
}
