use anyhow::Context;
use clap::Parser;
use rss_translator::{
    ChatCompletionsGateway, Config, ContentStore, HtmlContentExtractor, HttpFeedFetcher,
    SummaryCache, SyncEngine, TracingObserver,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rss-translator", about = "Sync an RSS feed, translate new headlines and cache summaries")]
struct Args {
    /// Feed URL to sync; defaults to RSS_URL from the environment.
    #[arg(long)]
    feed_url: Option<String>,

    /// SQLite database path; defaults to DATABASE_PATH from the environment.
    #[arg(long)]
    database: Option<String>,

    /// How many stored articles to print after the sync.
    #[arg(long, default_value_t = 20)]
    limit: i64,

    /// Generate (or fetch the cached) summary for one stored article url.
    #[arg(long)]
    summarize: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let feed_url = args.feed_url.unwrap_or_else(|| config.feed_url.clone());
    let database = args.database.unwrap_or_else(|| config.database_path.clone());

    let store = ContentStore::connect(&database)
        .await
        .with_context(|| format!("failed to open content store at {}", database))?;
    let gateway = Arc::new(ChatCompletionsGateway::new(&config));
    let fetcher = Arc::new(HttpFeedFetcher::new());

    let mut engine = SyncEngine::new(store.clone(), gateway.clone(), fetcher);
    engine.add_observer(Arc::new(TracingObserver));
    let engine = Arc::new(engine);

    // The sync runs on a background task; this foreground path stays free to
    // read the store and consumes the finished batch as a snapshot.
    let mut reports = engine.start_background(feed_url.clone());
    match reports.recv().await {
        Some(report) => {
            info!(
                "Sync finished: {} entries seen, {} new{}",
                report.entries_seen,
                report.new_articles.len(),
                if report.translation_degraded { " (translation degraded)" } else { "" }
            );
        }
        None => warn!("Sync did not complete; showing previously stored articles"),
    }

    let articles = store.list_by_source(&feed_url, args.limit).await?;
    for (index, article) in articles.iter().enumerate() {
        println!(
            "[{}] {}",
            index + 1,
            article.translated_title.as_deref().unwrap_or("(untranslated)")
        );
        println!("     {}", article.title);
        println!("     {}", article.url);
    }

    if let Some(url) = args.summarize {
        let article = store
            .get_by_url(&url)
            .await?
            .with_context(|| format!("no stored article with url {}", url))?;

        let cache = SummaryCache::new(store.clone(), gateway, Arc::new(HtmlContentExtractor::new()));
        let summary = cache.get_or_create(&article).await?;

        println!("\n=== Summary ===");
        println!("{}", article.translated_title.as_deref().unwrap_or(&article.title));
        println!("\n{}", summary);
    }

    Ok(())
}
