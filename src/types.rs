use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted article, enriched with its translation and (lazily) a summary.
///
/// `url` is the identity key: the store enforces a unique index on it and the
/// sync engine dedups strictly against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Store-assigned surrogate id; `None` until the row has been persisted.
    pub id: Option<i64>,
    /// Original-language headline, never empty.
    pub title: String,
    /// Target-language headline; `None` when translation failed or was skipped.
    pub translated_title: Option<String>,
    /// Canonical link, globally unique across the store.
    pub url: String,
    /// Fetch URL of the feed this article came from.
    pub source: String,
    /// Long-form synopsis; populated on first summary request.
    pub summary: Option<String>,
    /// First-ingestion time, refreshed if the same `url` is upserted again.
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Build a not-yet-persisted article from a feed entry.
    pub fn from_entry(entry: &FeedEntry, source: &str, translated_title: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            title: entry.title.clone(),
            translated_title,
            url: entry.link.clone(),
            source: source.to_string(),
            summary: None,
            created_at,
        }
    }
}

/// One item from the raw feed, prior to persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
}

/// A fetched and parsed feed, reduced to what the sync engine consumes.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error("feed fetch failed: {0}")]
    FetchFailed(String),

    #[error("translation backend error: {0}")]
    TranslationBackend(String),

    #[error("translation count mismatch: expected {expected}, got {actual}")]
    TranslationMismatch { expected: usize, actual: usize },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("article content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
