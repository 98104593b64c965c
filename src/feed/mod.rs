//! Bounded persisted launch feed.
//!
//! Launch events are scored on ingest, deduplicated into a SQLite-backed
//! window of the 500 most recent launches, and served as a cached,
//! per-client rate-limited feed.

pub mod cache;
pub mod rate_limit;
pub mod service;
pub mod storage;

pub use cache::FeedCache;
pub use rate_limit::ClientRateLimiter;
pub use service::{FeedConfig, FeedError, FeedResponse, FeedService};
pub use storage::{LaunchStorage, SqliteLaunchStore, FEED_CAP};
