pub mod config;
pub mod extract;
pub mod fetcher;
pub mod store;
pub mod summary;
pub mod sync;
pub mod translator;
pub mod types;

pub use config::{Config, SamplingConfig};
pub use extract::{ExtractContent, HtmlContentExtractor};
pub use fetcher::{FetchFeed, HttpFeedFetcher};
pub use store::ContentStore;
pub use summary::SummaryCache;
pub use sync::{SyncEngine, SyncObserver, SyncPhase, SyncReport, TracingObserver};
pub use translator::{ChatCompletionsGateway, TranslationGateway};
pub use types::{Article, FeedEntry, FetchedFeed, Result, TranslatorError};
