//! Types and tunable policy for the launch-integrity scorer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Verdict bucket assigned to a scored launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchVerdict {
    /// Score <= clean threshold, nothing alarming
    CleanIsh,
    /// Mid-range score, worth a second look
    Caution,
    /// High accumulated risk
    HighRisk,
    /// Subject identity missing or unverifiable; score is not meaningful
    Unknown,
}

impl LaunchVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchVerdict::CleanIsh => "clean-ish",
            LaunchVerdict::Caution => "caution",
            LaunchVerdict::HighRisk => "high-risk",
            LaunchVerdict::Unknown => "unknown",
        }
    }
}

/// One launch event, scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredToken {
    /// Mint address, if the event carried one
    pub mint: Option<String>,
    /// Derived launch-platform URL for the token
    pub platform_url: Option<String>,
    /// First-seen timestamp, ISO-8601
    pub first_seen: String,
    /// Provenance label for the record
    pub source: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
    /// Accumulated risk score, clamped to [0,100]
    pub score: u8,
    pub verdict: LaunchVerdict,
    /// Human-readable risk reasons; never empty
    pub reasons: Vec<String>,
    /// Opaque per-signal debug values for transparency
    pub signals: HashMap<String, serde_json::Value>,
}

/// Count of launches attributed to each creator within one observed batch.
///
/// Rebuilt from scratch on every scoring pass; this is a batch statistic,
/// not a reputation store.
pub type CreatorFrequencyMap = HashMap<String, u32>;

/// Risk points for each integrity heuristic. Tunable policy, not physical law.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPoints {
    pub invalid_mint_format: u32,
    pub missing_signature: u32,
    pub missing_name: u32,
    pub missing_symbol: u32,
    pub missing_or_invalid_uri: u32,
    pub non_https_uri: u32,
    pub bad_timestamp: u32,
    pub name_too_long: u32,
    pub symbol_too_long: u32,
    pub control_chars: u32,
    pub scammy_symbol: u32,
    pub creator_freq_high: u32,
    pub creator_freq_mid: u32,
    pub creator_freq_low: u32,
    pub creator_in_recent: u32,
    pub missing_creator: u32,
    pub mayhem_mode: u32,
    pub onchain_unavailable: u32,
    pub mint_not_found: u32,
    pub mint_authority_present: u32,
    pub freeze_authority_present: u32,
}

impl Default for RiskPoints {
    fn default() -> Self {
        Self {
            invalid_mint_format: 55,
            missing_signature: 10,
            missing_name: 10,
            missing_symbol: 10,
            missing_or_invalid_uri: 15,
            non_https_uri: 10,
            bad_timestamp: 10,
            name_too_long: 10,
            symbol_too_long: 10,
            control_chars: 25,
            scammy_symbol: 10,
            creator_freq_high: 30,
            creator_freq_mid: 20,
            creator_freq_low: 10,
            creator_in_recent: 5,
            missing_creator: 15,
            mayhem_mode: 10,
            onchain_unavailable: 8,
            mint_not_found: 45,
            mint_authority_present: 12,
            freeze_authority_present: 10,
        }
    }
}

/// Configuration for the integrity scorer and its on-chain pre-fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    /// Risk points per heuristic
    pub points: RiskPoints,
    /// Name length above which the content-risk penalty applies
    pub max_name_len: usize,
    /// Symbol length above which the content-risk penalty applies
    pub max_symbol_len: usize,
    /// Creator frequency tiers: (exclusive lower bound, points applied)
    pub creator_freq_high_over: u32,
    pub creator_freq_mid_over: u32,
    pub creator_freq_low_over: u32,
    /// How many of the newest launches form the "recent creators" set
    pub recent_creator_window: usize,
    /// Verdict bucket boundaries (inclusive upper bounds)
    pub clean_max_score: u8,
    pub caution_max_score: u8,
    /// Provenance label stamped on every scored record
    pub source_label: String,
    /// Base URL for derived per-token platform links
    pub platform_base_url: String,
    /// At most this many of the newest mints get an on-chain lookup per pass
    pub onchain_lookup_cap: usize,
    /// On-chain lookup cache TTL
    pub onchain_cache_ttl_seconds: u64,
    /// Max cached on-chain lookups
    pub onchain_cache_max_entries: u64,
    /// On-chain lookup rate limit (requests per second)
    pub onchain_requests_per_second: u32,
    /// RPC retry attempts for a single lookup
    pub rpc_retry_attempts: usize,
    /// RPC call timeout
    pub rpc_timeout_seconds: u64,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            points: RiskPoints::default(),
            max_name_len: 50,
            max_symbol_len: 10,
            creator_freq_high_over: 10,
            creator_freq_mid_over: 5,
            creator_freq_low_over: 2,
            recent_creator_window: 10,
            clean_max_score: 25,
            caution_max_score: 60,
            source_label: "pump.fun-webhook".to_string(),
            platform_base_url: "https://pump.fun/coin".to_string(),
            onchain_lookup_cap: 30,
            onchain_cache_ttl_seconds: 120,
            onchain_cache_max_entries: 2_000,
            onchain_requests_per_second: 10,
            rpc_retry_attempts: 3,
            rpc_timeout_seconds: 10,
        }
    }
}
