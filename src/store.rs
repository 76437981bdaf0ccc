use crate::types::{Article, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info, warn};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (title <> ''),
        translated_title TEXT,
        url TEXT NOT NULL CHECK (url <> ''),
        source TEXT NOT NULL,
        summary TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    // The unique index on url is the sole dedup mechanism; concurrent upserts
    // of the same url are serialized by SQLite, not by application locking.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_articles_url ON articles (url)
    "#,
];

/// Durable, deduplicated persistence for articles and their derived fields.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
}

impl ContentStore {
    /// Open (creating if missing) a file-backed store and run migrations.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("Content store ready at {}", path.as_ref().display());
        Ok(store)
    }

    /// In-memory store for tests. Pinned to a single connection so every
    /// handle sees the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        // Run all DDL on one connection: spreading the statements across the
        // pool leaves earlier connections with a cached schema that predates
        // the unique index, which makes later upserts fail at prepare time.
        let mut conn = self.pool.acquire().await?;
        for migration in MIGRATIONS {
            sqlx::query(migration).execute(&mut *conn).await?;
        }
        Ok(())
    }

    /// Upsert a batch of articles keyed by `url`. Each item is attempted
    /// independently: a failing row is logged and skipped, its siblings
    /// proceed. Returns the number of rows written.
    pub async fn upsert_articles(&self, articles: &[Article]) -> Result<usize> {
        let mut stored = 0;

        for article in articles {
            let result = sqlx::query(
                r#"
                INSERT INTO articles (title, translated_title, url, source, summary, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (url) DO UPDATE
                SET title = excluded.title,
                    translated_title = excluded.translated_title,
                    source = excluded.source,
                    summary = excluded.summary,
                    created_at = excluded.created_at
                "#,
            )
            .bind(&article.title)
            .bind(article.translated_title.as_deref())
            .bind(&article.url)
            .bind(&article.source)
            .bind(article.summary.as_deref())
            .bind(article.created_at)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => stored += 1,
                Err(e) => {
                    warn!("Failed to upsert article {}: {}", article.url, e);
                    continue;
                }
            }
        }

        debug!("Upserted {} of {} articles", stored, articles.len());
        Ok(stored)
    }

    /// Most recent articles for one feed, newest first.
    pub async fn list_by_source(&self, source: &str, limit: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, translated_title, url, source, summary, created_at
            FROM articles
            WHERE source = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(source)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(article_from_row).collect()
    }

    /// Url projection for one feed, used by the sync engine's diff. Unlike
    /// `list_by_source` this is never truncated, so previously seen urls are
    /// always recognized.
    pub async fn list_urls_by_source(&self, source: &str) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT url FROM articles WHERE source = ?")
            .bind(source)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("url").map_err(Into::into))
            .collect()
    }

    /// Point lookup by url, including the summary field.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Article>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, translated_title, url, source, summary, created_at
            FROM articles
            WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(article_from_row).transpose()
    }

    pub async fn get_summary_by_url(&self, url: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT summary FROM articles WHERE url = ?")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>("summary")?),
            None => Ok(None),
        }
    }

    /// Set the summary field for an existing article. A url with no matching
    /// row is a logged no-op, consistent with the read-through cache which
    /// only updates articles it has just looked up.
    pub async fn update_summary(&self, url: &str, summary: &str) -> Result<()> {
        let result = sqlx::query("UPDATE articles SET summary = ? WHERE url = ?")
            .bind(summary)
            .bind(url)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!("update_summary: no article with url {}", url);
        }
        Ok(())
    }
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        translated_title: row.try_get("translated_title")?,
        url: row.try_get("url")?,
        source: row.try_get("source")?,
        summary: row.try_get("summary")?,
        created_at: row.try_get("created_at")?,
    })
}
