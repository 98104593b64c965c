//! Types for the multi-module token analyzer.
//!
//! The analyzer consumes a [`SignalBundle`] — a nested structure of
//! provider-specific data where every sub-object may be partially or fully
//! absent — and produces one immutable [`AnalysisResult`].

use serde::{Deserialize, Serialize};

/// Stable module keys.
pub mod module_keys {
    pub const WORTH_ATTENTION: &str = "worth_attention";
    pub const FAKE_MOVE: &str = "fake_move";
    pub const TOO_LATE: &str = "too_late";
    pub const DEAD_OR_SLEEPING: &str = "dead_or_sleeping";
    pub const HOLDER_PSYCHOLOGY: &str = "holder_psychology";
    pub const RUG_NARRATIVE: &str = "rug_narrative";
}

/// Flag keys that are critical regardless of how a module reported them.
pub const CRITICAL_FLAG_KEYS: &[&str] = &[
    "lp_unlocked",
    "honeypot_sell_block",
    "wash_trading",
    "circular_trading",
    "bot_pattern",
    "whale_concentration",
    "creator_dumping",
    "mint_authority_active",
    "freeze_authority_active",
    "rug_pattern",
];

/// Liquidity-lock flags are mutually exclusive in the output; earlier keys in
/// this list beat later ones.
pub const LP_FLAG_PRIORITY: &[&str] = &[
    "lp_unlocked",
    "lp_mixed",
    "lp_stale",
    "lp_unverified",
    "lp_unknown",
];

// ---------------------------------------------------------------------------
// Signal bundle (input)
// ---------------------------------------------------------------------------

/// Multi-provider signal bundle for one token. No field access may assume
/// presence: each provider sub-object, and each field inside one, can be
/// missing independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalBundle {
    /// Token address the bundle describes
    pub address: String,
    /// Originating platform, when known (e.g. "pump.fun")
    pub platform: Option<String>,
    /// Token creation time, unix seconds
    pub created_at: Option<i64>,
    /// Primary on-chain provider data
    pub chain: Option<ChainProviderData>,
    /// Secondary market-data provider data
    pub market: Option<MarketProviderData>,
}

impl SignalBundle {
    /// Token age in hours relative to `now`, when the creation time is known.
    pub fn age_hours(&self, now: i64) -> Option<f64> {
        self.created_at
            .map(|created| (now - created).max(0) as f64 / 3600.0)
    }
}

/// Data from the primary on-chain provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainProviderData {
    /// Whether the provider call itself succeeded
    pub success: bool,
    pub token_info: Option<TokenInfo>,
    pub holders: Option<HolderDistribution>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub supply: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolderDistribution {
    pub total_holders: Option<u32>,
    /// Combined share of the top 10 holders, 0..=100
    pub top10_pct: Option<f64>,
    /// Share of the single largest holder, 0..=100
    pub top_holder_pct: Option<f64>,
    /// Share still held by the creator, 0..=100
    pub creator_pct: Option<f64>,
}

/// Data from the secondary market-data provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketProviderData {
    /// Whether the provider call itself succeeded
    pub success: bool,
    pub lp_lock: Option<LpLockInfo>,
    pub volume: Option<VolumeStats>,
    pub trades: Option<TradeStats>,
    pub price: Option<PriceStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpLockInfo {
    pub status: LpLockStatus,
    /// Share of liquidity locked, 0..=100
    pub locked_pct: Option<f64>,
    /// When the lock status was last checked, unix seconds
    pub checked_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LpLockStatus {
    Locked,
    Unlocked,
    /// Partially locked across pools
    Mixed,
    /// Lock data exists but is old
    Stale,
    /// Provider could not verify either way
    Unverified,
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeStats {
    pub vol_5m_usd: Option<f64>,
    pub vol_1h_usd: Option<f64>,
    pub vol_24h_usd: Option<f64>,
    pub buy_count_24h: Option<u32>,
    pub sell_count_24h: Option<u32>,
    pub unique_traders_24h: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeStats {
    /// Share of trades from wallets that traded this token repeatedly, 0..=1
    pub repeated_wallet_ratio: Option<f64>,
    /// Share of volume moving in circular buy/sell loops, 0..=1
    pub circular_ratio: Option<f64>,
    /// Share of trades with bot-like timing, 0..=1
    pub bot_like_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceStats {
    pub change_5m_pct: Option<f64>,
    pub change_1h_pct: Option<f64>,
    pub change_24h_pct: Option<f64>,
    /// Distance from all-time high, negative when below it
    pub from_ath_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Module output
// ---------------------------------------------------------------------------

/// Output of one scoring module. Higher score = more favorable unless a
/// module documents otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleResult {
    /// 0..=100
    pub score: f64,
    /// 0..=1, degraded when inputs were missing
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub flags: Vec<ModuleFlag>,
}

impl ModuleResult {
    pub fn new(score: f64, confidence: f64) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            confidence: confidence.clamp(0.0, 1.0),
            reasons: Vec::new(),
            flags: Vec::new(),
        }
    }
}

/// A risk flag as emitted at the module boundary: either a legacy bare
/// identifier or the full structured record. Normalized to [`RiskFlag`]
/// before aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleFlag {
    Legacy(String),
    Structured(RiskFlag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagStatus {
    Verified,
    Unverified,
    Stale,
    Ambiguous,
}

/// Canonical structured risk flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    /// Stable identifier; presentation layers key off this
    pub key: String,
    /// Short human label
    pub label: String,
    pub severity: Severity,
    /// 0..=1
    pub confidence: f64,
    pub status: FlagStatus,
    /// What was actually observed
    pub evidence: String,
    /// Where a human can double-check
    pub verify_hint: Option<String>,
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// Action verdict for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Enter,
    Wait,
    Ignore,
    Exit,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Enter => "ENTER",
            Verdict::Wait => "WAIT",
            Verdict::Ignore => "IGNORE",
            Verdict::Exit => "EXIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Full,
    Partial,
}

/// Per-module score/confidence summary carried in the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub module: String,
    pub score: f64,
    pub confidence: f64,
}

/// Derived token display info.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenDisplay {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub age_hours: Option<f64>,
}

/// Final analysis for one token. Constructed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub address: String,
    pub verdict: Verdict,
    pub confidence: ConfidenceLevel,
    /// 3 to 5 selected reasons
    pub reasons: Vec<String>,
    /// Deduplicated, severity-then-confidence sorted
    pub risk_flags: Vec<RiskFlag>,
    pub timing_note: Option<String>,
    pub data_quality: DataQuality,
    pub modules: Vec<ModuleSummary>,
    pub token: TokenDisplay,
    /// ISO-8601 analysis time
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Fixed per-module combination weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleWeights {
    pub worth_attention: f64,
    pub fake_move: f64,
    pub too_late: f64,
    pub dead_or_sleeping: f64,
    pub holder_psychology: f64,
    pub rug_narrative: f64,
    /// Applied to module keys this table does not know
    pub fallback: f64,
}

impl ModuleWeights {
    pub fn for_key(&self, key: &str) -> f64 {
        match key {
            module_keys::WORTH_ATTENTION => self.worth_attention,
            module_keys::FAKE_MOVE => self.fake_move,
            module_keys::TOO_LATE => self.too_late,
            module_keys::DEAD_OR_SLEEPING => self.dead_or_sleeping,
            module_keys::HOLDER_PSYCHOLOGY => self.holder_psychology,
            module_keys::RUG_NARRATIVE => self.rug_narrative,
            _ => self.fallback,
        }
    }
}

impl Default for ModuleWeights {
    fn default() -> Self {
        Self {
            worth_attention: 0.15,
            fake_move: 0.25,
            too_late: 0.20,
            dead_or_sleeping: 0.10,
            holder_psychology: 0.15,
            rug_narrative: 0.15,
            fallback: 0.10,
        }
    }
}

/// Analyzer policy. All verdict thresholds are tunable policy, not physical
/// law; the decision tree's structure lives in the aggregator, the numbers
/// live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub weights: ModuleWeights,
    /// Tokens younger than this cannot be assessed with high confidence
    pub very_new_hours: f64,
    /// Mean-confidence cap applied to very new tokens
    pub very_new_confidence_cap: f64,
    /// Platform whose very-new ENTER verdicts get the volatility downgrade
    pub tracked_platform: String,

    // Verdict decision tree thresholds, in priority order
    pub exit_rug_score_below: f64,
    pub exit_fake_score_below: f64,
    pub enter_weighted_min: f64,
    pub enter_fake_min: f64,
    pub enter_late_min: f64,
    pub enter_rug_min: f64,
    pub wait_weighted_min: f64,
    pub wait_rug_min: f64,
    pub wait_late_below: f64,
    pub wait_fake_min: f64,

    // Confidence level boundaries
    pub conf_high: f64,
    pub conf_medium: f64,
    pub exit_rug_conf_high: f64,
    pub wait_conf_medium: f64,

    // Reason selection
    pub reason_min_confidence: f64,
    pub reason_dedup_prefix_len: usize,
    pub reasons_min: usize,
    pub reasons_max: usize,
    /// ENTER reason sort favors reasons attached to scores at or above this
    pub enter_reason_score_min: f64,

    /// Share of the data-quality point budget required for `full`
    pub data_quality_full_ratio: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            weights: ModuleWeights::default(),
            very_new_hours: 6.0,
            very_new_confidence_cap: 0.55,
            tracked_platform: "pump.fun".to_string(),
            exit_rug_score_below: 35.0,
            exit_fake_score_below: 30.0,
            enter_weighted_min: 68.0,
            enter_fake_min: 55.0,
            enter_late_min: 50.0,
            enter_rug_min: 55.0,
            wait_weighted_min: 50.0,
            wait_rug_min: 45.0,
            wait_late_below: 55.0,
            wait_fake_min: 45.0,
            conf_high: 0.7,
            conf_medium: 0.5,
            exit_rug_conf_high: 0.6,
            wait_conf_medium: 0.6,
            reason_min_confidence: 0.3,
            reason_dedup_prefix_len: 30,
            reasons_min: 3,
            reasons_max: 5,
            enter_reason_score_min: 60.0,
            data_quality_full_ratio: 0.7,
        }
    }
}
