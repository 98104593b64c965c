//! Short-TTL cache for assembled feed responses.
//!
//! Feed reads vastly outnumber launch arrivals, so the fully assembled
//! response is cached for a few seconds and rebuilt lazily on expiry.

use std::time::Duration;

use moka::future::Cache;

use crate::feed::service::FeedResponse;

/// Single well-known key; the feed has one global view.
const FEED_KEY: &str = "feed";

pub struct FeedCache {
    cache: Cache<&'static str, FeedResponse>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn get(&self) -> Option<FeedResponse> {
        self.cache.get(FEED_KEY).await
    }

    pub async fn put(&self, response: FeedResponse) {
        self.cache.insert(FEED_KEY, response).await;
    }

    /// Drop the cached response so the next read rebuilds.
    pub async fn invalidate(&self) {
        self.cache.invalidate(FEED_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::service::FeedResponse;

    fn response(count: usize) -> FeedResponse {
        FeedResponse {
            ok: true,
            version: "1".to_string(),
            updated_utc: "2026-08-26T00:00:00+00:00".to_string(),
            source_info: "test".to_string(),
            count,
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = FeedCache::new(Duration::from_secs(60));
        assert!(cache.get().await.is_none());
        cache.put(response(3)).await;
        assert_eq!(cache.get().await.map(|r| r.count), Some(3));
    }

    #[tokio::test]
    async fn test_invalidate_clears() {
        let cache = FeedCache::new(Duration::from_secs(60));
        cache.put(response(3)).await;
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }
}
