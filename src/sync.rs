use crate::fetcher::FetchFeed;
use crate::store::ContentStore;
use crate::translator::TranslationGateway;
use crate::types::{Article, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Phase of a sync cycle, reported through observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Fetching,
    Diffing,
    Translating,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Fetching => "fetching",
            SyncPhase::Diffing => "diffing",
            SyncPhase::Translating => "translating",
            SyncPhase::Persisting => "persisting",
            SyncPhase::Done => "done",
            SyncPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Progress reporting channel; not part of the correctness contract. Both
/// methods default to no-ops so observers can implement either one.
pub trait SyncObserver: Send + Sync {
    fn on_status(&self, _status: &str, _is_error: bool) {}
    fn on_log(&self, _line: &str) {}
}

/// Observer that forwards engine progress to the `tracing` log stream.
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn on_status(&self, status: &str, is_error: bool) {
        if is_error {
            error!("sync: {}", status);
        } else {
            info!("sync: {}", status);
        }
    }

    fn on_log(&self, line: &str) {
        info!("{}", line);
    }
}

/// Outcome of one completed sync cycle. `new_articles` is the complete,
/// immutable batch that was persisted; the foreground consumes this snapshot
/// instead of sharing a mutable list with the background task.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub feed_title: Option<String>,
    pub entries_seen: usize,
    pub new_articles: Vec<Article>,
    pub translation_degraded: bool,
}

/// Orchestrates one fetch → diff → translate → persist pass per invocation.
///
/// Dedup is computed strictly against `url`: previously seen urls are skipped
/// entirely, so a sync never touches an already-translated article.
pub struct SyncEngine {
    store: ContentStore,
    gateway: Arc<dyn TranslationGateway>,
    fetcher: Arc<dyn FetchFeed>,
    observers: Vec<Arc<dyn SyncObserver>>,
}

impl SyncEngine {
    pub fn new(
        store: ContentStore,
        gateway: Arc<dyn TranslationGateway>,
        fetcher: Arc<dyn FetchFeed>,
    ) -> Self {
        Self {
            store,
            gateway,
            fetcher,
            observers: Vec::new(),
        }
    }

    /// Attach a progress observer. Any number may attach, including none.
    pub fn add_observer(&mut self, observer: Arc<dyn SyncObserver>) {
        self.observers.push(observer);
    }

    fn status(&self, phase: SyncPhase, message: &str) {
        let is_error = phase == SyncPhase::Failed;
        for observer in &self.observers {
            observer.on_status(&format!("[{}] {}", phase, message), is_error);
        }
    }

    fn log(&self, line: &str) {
        for observer in &self.observers {
            observer.on_log(line);
        }
    }

    /// Run one sync cycle in the foreground.
    pub async fn sync_once(&self, feed_url: &str) -> Result<SyncReport> {
        self.status(SyncPhase::Fetching, feed_url);
        let feed = match self.fetcher.fetch(feed_url).await {
            Ok(feed) => feed,
            Err(e) => {
                self.status(SyncPhase::Failed, &e.to_string());
                return Err(e);
            }
        };

        if let Some(title) = &feed.title {
            self.log(&format!("Feed: {}", title));
        }
        if let Some(description) = &feed.description {
            self.log(&format!("Description: {}", description));
        }
        let entries_seen = feed.entries.len();

        self.status(SyncPhase::Diffing, &format!("{} entries fetched", entries_seen));
        let known: HashSet<String> = self
            .store
            .list_urls_by_source(feed_url)
            .await?
            .into_iter()
            .collect();

        // Keep feed order; drop urls already stored and duplicates within the
        // fetch itself (first occurrence wins).
        let mut seen = HashSet::new();
        let new_entries: Vec<_> = feed
            .entries
            .into_iter()
            .filter(|entry| !known.contains(&entry.link) && seen.insert(entry.link.clone()))
            .collect();

        if new_entries.is_empty() {
            self.status(SyncPhase::Done, "no new entries");
            return Ok(SyncReport {
                feed_title: feed.title,
                entries_seen,
                new_articles: Vec::new(),
                translation_degraded: false,
            });
        }

        self.status(SyncPhase::Translating, &format!("{} new entries", new_entries.len()));
        let titles: Vec<String> = new_entries.iter().map(|entry| entry.title.clone()).collect();

        // Translation failures degrade instead of aborting: the new urls must
        // still be recorded so they are never re-processed on the next cycle.
        let (translations, degraded) = match self.gateway.translate_batch(&titles).await {
            Ok(translated) => (translated.into_iter().map(Some).collect::<Vec<_>>(), false),
            Err(e) => {
                warn!("Translation failed, persisting originals untranslated: {}", e);
                self.log(&format!("Translation failed: {}", e));
                (vec![None; new_entries.len()], true)
            }
        };

        self.status(SyncPhase::Persisting, &format!("{} articles", new_entries.len()));
        let now = Utc::now();
        let articles: Vec<Article> = new_entries
            .iter()
            .zip(translations)
            .map(|(entry, translated)| Article::from_entry(entry, feed_url, translated, now))
            .collect();

        let stored = match self.store.upsert_articles(&articles).await {
            Ok(stored) => stored,
            Err(e) => {
                self.status(SyncPhase::Failed, &e.to_string());
                return Err(e);
            }
        };

        for article in &articles {
            self.log(&format!(
                "+ {}",
                article.translated_title.as_deref().unwrap_or(&article.title)
            ));
        }
        self.status(
            SyncPhase::Done,
            &format!("{} new articles stored ({} fetched)", stored, entries_seen),
        );

        Ok(SyncReport {
            feed_title: feed.title,
            entries_seen,
            new_articles: articles,
            translation_degraded: degraded,
        })
    }

    /// Run one sync cycle on a background task. The completed report is
    /// published over the returned channel; a failed cycle closes the channel
    /// without sending (the error has already been reported to observers).
    pub fn start_background(self: &Arc<Self>, feed_url: String) -> mpsc::UnboundedReceiver<SyncReport> {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::clone(self);

        tokio::spawn(async move {
            match engine.sync_once(&feed_url).await {
                Ok(report) => {
                    let _ = tx.send(report);
                }
                Err(e) => {
                    error!("Background sync of {} failed: {}", feed_url, e);
                }
            }
        });

        rx
    }
}
