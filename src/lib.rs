//! mintsift — token-launch risk scoring for Solana memecoin platforms.
//!
//! Two independent scoring subsystems share one design pattern (additive
//! risk heuristics, clamp, verdict bucket, explanation list):
//!
//! - [`integrity`] scores freshly observed token-creation events from their
//!   own payload plus batch-level creator statistics and optional pre-fetched
//!   on-chain mint state.
//! - [`analyzer`] runs six independent heuristic modules over a per-token
//!   signal bundle and combines them into an ENTER/WAIT/IGNORE/EXIT verdict.
//!
//! [`ingest`] decodes raw webhook payloads into launch events, and [`feed`]
//! persists and serves the bounded window of recent scored launches.

pub mod analyzer;
pub mod feed;
pub mod ingest;
pub mod integrity;
pub mod types;
pub mod validators;

pub use analyzer::{AnalysisResult, AnalysisRunner, TokenAnalyzer, Verdict};
pub use feed::{FeedService, SqliteLaunchStore};
pub use integrity::{IntegrityScorer, LaunchVerdict, MintAccountFetcher, ScoredToken};
pub use types::{LaunchEvent, OnChainMint};
