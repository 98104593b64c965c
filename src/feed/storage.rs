//! Persistence contract for the launch feed.
//!
//! The feed keeps a bounded window of the most recent scored launches.
//! Dedup happens at insert: a launch already present by mint or signature is
//! dropped, and the table is pruned back to the cap after each insert.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use tracing::{debug, info};

use crate::integrity::types::ScoredToken;

/// Most recent launches kept in the feed.
pub const FEED_CAP: usize = 500;

/// Contract for the bounded launch feed store.
#[async_trait]
pub trait LaunchStorage: Send + Sync {
    /// Insert a scored launch unless one with the same mint or signature is
    /// already stored. Returns whether a row was inserted.
    async fn insert_if_new(&self, token: &ScoredToken, signature: Option<&str>) -> Result<bool>;

    /// The `limit` most recent launches, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<ScoredToken>>;

    /// Number of stored launches.
    async fn count(&self) -> Result<i64>;
}

#[derive(FromRow)]
struct LaunchRow {
    mint: Option<String>,
    platform_url: Option<String>,
    first_seen: String,
    source: String,
    name: Option<String>,
    symbol: Option<String>,
    uri: Option<String>,
    score: i64,
    verdict: String,
    reasons: String, // JSON
    signals: String, // JSON
}

/// SQLite implementation of [`LaunchStorage`].
pub struct SqliteLaunchStore {
    pool: Pool<Sqlite>,
    cap: usize,
}

impl SqliteLaunchStore {
    /// Open (or create) the feed database at `db_url`, e.g.
    /// `sqlite:./launches.db?mode=rwc` or `sqlite::memory:`.
    pub async fn new(db_url: &str) -> Result<Arc<Self>> {
        Self::with_cap(db_url, FEED_CAP).await
    }

    pub async fn with_cap(db_url: &str, cap: usize) -> Result<Arc<Self>> {
        // An in-memory database is private to its connection; a larger pool
        // would hand each connection an empty database of its own.
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await
            .context("Failed to connect to SQLite database")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS launches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mint TEXT,
                signature TEXT,
                platform_url TEXT,
                first_seen TEXT NOT NULL,
                source TEXT NOT NULL,
                name TEXT,
                symbol TEXT,
                uri TEXT,
                score INTEGER NOT NULL,
                verdict TEXT NOT NULL,
                reasons TEXT NOT NULL,
                signals TEXT NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await
        .context("Failed to create launches table")?;

        info!("launch store initialized at {}", db_url);
        Ok(Arc::new(Self { pool, cap }))
    }

    fn row_to_token(row: LaunchRow) -> Result<ScoredToken> {
        Ok(ScoredToken {
            mint: row.mint,
            platform_url: row.platform_url,
            first_seen: row.first_seen,
            source: row.source,
            name: row.name,
            symbol: row.symbol,
            uri: row.uri,
            score: row.score.clamp(0, 100) as u8,
            verdict: serde_json::from_str(&row.verdict).context("bad verdict in store")?,
            reasons: serde_json::from_str(&row.reasons).context("bad reasons in store")?,
            signals: serde_json::from_str(&row.signals).context("bad signals in store")?,
        })
    }
}

#[async_trait]
impl LaunchStorage for SqliteLaunchStore {
    async fn insert_if_new(&self, token: &ScoredToken, signature: Option<&str>) -> Result<bool> {
        let duplicate: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM launches
            WHERE (mint IS NOT NULL AND mint = ?)
               OR (signature IS NOT NULL AND signature = ?)
            LIMIT 1;
            "#,
        )
        .bind(&token.mint)
        .bind(signature)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to check for duplicate launch")?;

        if duplicate.is_some() {
            debug!("skipping duplicate launch for mint {:?}", token.mint);
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO launches (
                mint, signature, platform_url, first_seen, source,
                name, symbol, uri, score, verdict, reasons, signals
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
            "#,
        )
        .bind(&token.mint)
        .bind(signature)
        .bind(&token.platform_url)
        .bind(&token.first_seen)
        .bind(&token.source)
        .bind(&token.name)
        .bind(&token.symbol)
        .bind(&token.uri)
        .bind(token.score as i64)
        .bind(serde_json::to_string(&token.verdict)?)
        .bind(serde_json::to_string(&token.reasons)?)
        .bind(serde_json::to_string(&token.signals)?)
        .execute(&self.pool)
        .await
        .context("Failed to insert launch")?;

        // Keep only the newest `cap` rows.
        sqlx::query(
            r#"
            DELETE FROM launches WHERE id NOT IN (
                SELECT id FROM launches ORDER BY id DESC LIMIT ?
            );
            "#,
        )
        .bind(self.cap as i64)
        .execute(&self.pool)
        .await
        .context("Failed to prune launches")?;

        Ok(true)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ScoredToken>> {
        let rows: Vec<LaunchRow> = sqlx::query_as(
            r#"
            SELECT mint, platform_url, first_seen, source, name, symbol, uri,
                   score, verdict, reasons, signals
            FROM launches ORDER BY id DESC LIMIT ?;
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch recent launches")?;

        rows.into_iter().map(Self::row_to_token).collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM launches")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count launches")?;
        Ok(count.0)
    }
}
