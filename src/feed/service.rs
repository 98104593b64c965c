//! Feed assembly: scored launches in, cached bounded feed out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::feed::cache::FeedCache;
use crate::feed::rate_limit::ClientRateLimiter;
use crate::feed::storage::LaunchStorage;
use crate::integrity::scorer::IntegrityScorer;
use crate::integrity::types::ScoredToken;
use crate::types::{LaunchEvent, OnChainMint};

/// Feed assembly policy.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Version string surfaced in every response
    pub version: String,
    /// Provenance label surfaced in every response
    pub source_info: String,
    /// How many launches one feed response carries
    pub feed_size: usize,
    /// Assembled-response cache TTL
    pub response_ttl: Duration,
    /// Per-client request budget per minute
    pub requests_per_minute: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            source_info: "pump.fun-webhook".to_string(),
            feed_size: 100,
            response_ttl: Duration::from_secs(5),
            requests_per_minute: 60,
        }
    }
}

/// Wire shape of one feed read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub ok: bool,
    pub version: String,
    pub updated_utc: String,
    pub source_info: String,
    pub count: usize,
    pub items: Vec<ScoredToken>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("client {0} exceeded its request budget")]
    RateLimited(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Scores incoming launches, persists them, and serves the bounded feed.
pub struct FeedService {
    scorer: IntegrityScorer,
    storage: Arc<dyn LaunchStorage>,
    cache: FeedCache,
    limiter: ClientRateLimiter,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(scorer: IntegrityScorer, storage: Arc<dyn LaunchStorage>, config: FeedConfig) -> Self {
        Self {
            scorer,
            storage,
            cache: FeedCache::new(config.response_ttl),
            limiter: ClientRateLimiter::new(config.requests_per_minute),
            config,
        }
    }

    /// Score a batch of launch events (newest first) and persist the ones
    /// not already stored. Returns how many rows were inserted.
    #[instrument(skip(self, events, onchain), fields(batch = events.len()))]
    pub async fn ingest_batch(
        &self,
        events: &[LaunchEvent],
        onchain: &HashMap<String, OnChainMint>,
    ) -> Result<usize> {
        let scored = self.scorer.score_batch(events, onchain);

        let mut inserted = 0;
        for (event, token) in events.iter().zip(scored.iter()) {
            if self
                .storage
                .insert_if_new(token, event.signature.as_deref())
                .await?
            {
                inserted += 1;
            }
        }

        if inserted > 0 {
            self.cache.invalidate().await;
            info!("stored {} new launches", inserted);
        }
        Ok(inserted)
    }

    /// Serve the scored feed to `client_id`, rate limited per client and
    /// cached across clients.
    #[instrument(skip(self), fields(client = %client_id))]
    pub async fn scored_feed(&self, client_id: &str) -> Result<FeedResponse, FeedError> {
        if !self.limiter.check(client_id) {
            return Err(FeedError::RateLimited(client_id.to_string()));
        }

        if let Some(cached) = self.cache.get().await {
            debug!("serving cached feed");
            return Ok(cached);
        }

        let items = self.storage.recent(self.config.feed_size).await?;
        let response = FeedResponse {
            ok: true,
            version: self.config.version.clone(),
            updated_utc: Utc::now().to_rfc3339(),
            source_info: self.config.source_info.clone(),
            count: items.len(),
            items,
        };
        self.cache.put(response.clone()).await;
        Ok(response)
    }
}
