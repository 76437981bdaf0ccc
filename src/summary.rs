use crate::extract::ExtractContent;
use crate::store::ContentStore;
use crate::translator::TranslationGateway;
use crate::types::{Article, Result, TranslatorError};
use std::sync::Arc;
use tracing::{debug, info};

/// Read-through cache for long-form article summaries.
///
/// A hit returns the stored summary with no network call. A miss fetches the
/// article body, summarizes it and persists the result. There is no eviction
/// and no negative caching: a content or backend failure leaves nothing
/// behind, so the next request retries from scratch.
pub struct SummaryCache {
    store: ContentStore,
    gateway: Arc<dyn TranslationGateway>,
    extractor: Arc<dyn ExtractContent>,
}

impl SummaryCache {
    pub fn new(
        store: ContentStore,
        gateway: Arc<dyn TranslationGateway>,
        extractor: Arc<dyn ExtractContent>,
    ) -> Self {
        Self {
            store,
            gateway,
            extractor,
        }
    }

    pub async fn get_or_create(&self, article: &Article) -> Result<String> {
        if let Some(summary) = self.store.get_summary_by_url(&article.url).await? {
            debug!("Summary cache hit for {}", article.url);
            return Ok(summary);
        }

        info!("Summary cache miss for {}, generating", article.url);
        let content = self
            .extractor
            .extract_text(&article.url)
            .await
            .ok_or_else(|| TranslatorError::ContentUnavailable(article.url.clone()))?;

        let summary = self.gateway.summarize(&article.title, &content).await?;
        self.store.update_summary(&article.url, &summary).await?;

        Ok(summary)
    }
}
