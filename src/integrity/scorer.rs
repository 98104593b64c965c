//! Launch-integrity scoring engine.
//!
//! Accumulates additive risk points over a single launch event plus
//! batch-level creator statistics and optional pre-fetched on-chain state.
//! Pure and synchronous: all network data is supplied by the caller, so the
//! same inputs always yield the same `ScoredToken`.

use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{TimeZone, Utc};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::integrity::types::{CreatorFrequencyMap, IntegrityConfig, LaunchVerdict, ScoredToken};
use crate::types::{LaunchEvent, OnChainMint};
use crate::validators::{self, UriCheck};

/// Launch-integrity scorer.
#[derive(Debug, Clone, Default)]
pub struct IntegrityScorer {
    config: IntegrityConfig,
}

impl IntegrityScorer {
    pub fn new(config: IntegrityConfig) -> Self {
        Self { config }
    }

    /// Score a whole batch of launch events, newest first.
    ///
    /// The creator frequency map and the recent-creators set are rebuilt from
    /// this batch alone. A panic while scoring one item is isolated: the item
    /// is replaced with a synthetic worst-case record carrying the panic
    /// message, so one bad record cannot fail the pass.
    #[instrument(skip(self, events, onchain), fields(batch = events.len()))]
    pub fn score_batch(
        &self,
        events: &[LaunchEvent],
        onchain: &HashMap<String, OnChainMint>,
    ) -> Vec<ScoredToken> {
        let now = Utc::now().timestamp();
        let freq = build_creator_frequency(events);
        let recent = recent_creators(events, self.config.recent_creator_window);

        events
            .iter()
            .map(|event| {
                let lookup = event
                    .mint
                    .as_deref()
                    .and_then(|mint| onchain.get(mint));
                catch_unwind(AssertUnwindSafe(|| {
                    self.score_event_at(event, &freq, &recent, lookup, now)
                }))
                .unwrap_or_else(|panic| {
                    let message = panic_message(panic);
                    warn!("scoring panicked for {:?}: {}", event.mint, message);
                    self.worst_case(event, now, message)
                })
            })
            .collect()
    }

    /// Score a single event against the current batch statistics, using the
    /// wall clock for timestamp sanity.
    pub fn score_event(
        &self,
        event: &LaunchEvent,
        freq: &CreatorFrequencyMap,
        recent_creators: &HashSet<String>,
        onchain: Option<&OnChainMint>,
    ) -> ScoredToken {
        self.score_event_at(event, freq, recent_creators, onchain, Utc::now().timestamp())
    }

    /// Score a single event with an explicit `now` (unix seconds).
    #[instrument(skip_all, fields(mint = ?event.mint))]
    pub fn score_event_at(
        &self,
        event: &LaunchEvent,
        freq: &CreatorFrequencyMap,
        recent_creators: &HashSet<String>,
        onchain: Option<&OnChainMint>,
        now: i64,
    ) -> ScoredToken {
        let points = &self.config.points;
        let mut score: u32 = 0;
        let mut reasons: Vec<String> = Vec::new();
        let mut signals: HashMap<String, serde_json::Value> = HashMap::new();

        // Terminal: without a mint there is no subject to score.
        let mint = match event.mint.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => {
                return self.terminal(event, now, "Missing mint address", "missing_mint");
            }
        };

        let mint_format_valid = validators::is_valid_mint(mint);
        if !mint_format_valid {
            score += points.invalid_mint_format;
            reasons.push("Mint address is not valid base58 of the expected length".to_string());
        }
        signals.insert("mint_format_valid".into(), json!(mint_format_valid));

        if event.signature.as_deref().map_or(true, str::is_empty) {
            score += points.missing_signature;
            reasons.push("Missing transaction signature".to_string());
        }
        if event.name.as_deref().map_or(true, str::is_empty) {
            score += points.missing_name;
            reasons.push("Missing token name".to_string());
        }
        if event.symbol.as_deref().map_or(true, str::is_empty) {
            score += points.missing_symbol;
            reasons.push("Missing token symbol".to_string());
        }

        match event.uri.as_deref().filter(|u| !u.is_empty()) {
            None => {
                score += points.missing_or_invalid_uri;
                reasons.push("Missing metadata URI".to_string());
            }
            Some(uri) => match validators::check_uri(uri) {
                UriCheck::Suspicious => {
                    // Terminal: the URI itself looks actively malicious.
                    return self.terminal(
                        event,
                        now,
                        "Metadata URI matches a malicious pattern",
                        "suspicious_uri",
                    );
                }
                UriCheck::Invalid => {
                    score += points.missing_or_invalid_uri;
                    reasons.push("Metadata URI does not parse".to_string());
                }
                UriCheck::NotHttps => {
                    score += points.non_https_uri;
                    reasons.push("Metadata URI is not served over https".to_string());
                }
                UriCheck::Https => {}
            },
        }

        match event.timestamp {
            Some(ts) if validators::timestamp_in_range(ts, now) => {}
            _ => {
                score += points.bad_timestamp;
                reasons.push("Launch timestamp missing or outside the sane window".to_string());
            }
        }

        // Content risk
        if let Some(name) = event.name.as_deref() {
            if name.chars().count() > self.config.max_name_len {
                score += points.name_too_long;
                reasons.push(format!(
                    "Name longer than {} characters",
                    self.config.max_name_len
                ));
            }
        }
        if let Some(symbol) = event.symbol.as_deref() {
            if symbol.chars().count() > self.config.max_symbol_len {
                score += points.symbol_too_long;
                reasons.push(format!(
                    "Symbol longer than {} characters",
                    self.config.max_symbol_len
                ));
            }
            if validators::is_scammy_symbol(symbol) {
                score += points.scammy_symbol;
                reasons.push("Symbol matches a scammy pattern".to_string());
            }
        }
        let has_control = event.name.as_deref().is_some_and(validators::has_control_chars)
            || event.symbol.as_deref().is_some_and(validators::has_control_chars);
        if has_control {
            score += points.control_chars;
            reasons.push("Name or symbol contains control characters".to_string());
        }

        // Creator reuse within the observed batch
        match event.creator_hex.as_deref().filter(|c| !c.is_empty()) {
            None => {
                score += points.missing_creator;
                reasons.push("Missing creator identity".to_string());
            }
            Some(creator) if !validators::is_valid_creator_hex(creator) => {
                score += points.missing_creator;
                reasons.push("Creator identity is not a 32-byte hex key".to_string());
            }
            Some(creator) => {
                let frequency = freq.get(creator).copied().unwrap_or(0);
                signals.insert("creator_frequency".into(), json!(frequency));
                let tier_points = if frequency > self.config.creator_freq_high_over {
                    points.creator_freq_high
                } else if frequency > self.config.creator_freq_mid_over {
                    points.creator_freq_mid
                } else if frequency > self.config.creator_freq_low_over {
                    points.creator_freq_low
                } else {
                    0
                };
                if tier_points > 0 {
                    score += tier_points;
                    reasons.push(format!(
                        "Creator launched {} tokens in this batch",
                        frequency
                    ));
                }
                if frequency > 1 && recent_creators.contains(creator) {
                    score += points.creator_in_recent;
                    reasons.push("Creator also appears among the most recent launches".to_string());
                }
            }
        }

        if event.is_mayhem {
            score += points.mayhem_mode;
            reasons.push("Launched with relaxed platform validation".to_string());
        }

        // On-chain cross-check, supplied pre-fetched by the caller
        let onchain_confirmed = match onchain {
            None => {
                score += points.onchain_unavailable;
                reasons.push("On-chain mint state unavailable; scored without it".to_string());
                signals.insert("onchain".into(), json!("unavailable"));
                false
            }
            Some(info) if !info.exists => {
                score += points.mint_not_found;
                reasons.push("Mint account not found on-chain".to_string());
                signals.insert("onchain".into(), json!("not_found"));
                true
            }
            Some(info) => {
                signals.insert("onchain".into(), json!("found"));
                signals.insert("decimals".into(), json!(info.decimals));
                if info.mint_authority.is_some() {
                    score += points.mint_authority_present;
                    reasons.push("Mint authority still present; supply can be inflated".to_string());
                } else {
                    reasons.push("Mint authority revoked".to_string());
                }
                if info.freeze_authority.is_some() {
                    score += points.freeze_authority_present;
                    reasons.push("Freeze authority still present".to_string());
                } else {
                    reasons.push("Freeze authority revoked".to_string());
                }
                true
            }
        };

        let clamped = score.min(100) as u8;
        let verdict = if !mint_format_valid && !onchain_confirmed {
            // Malformed identity that nothing on-chain could confirm.
            LaunchVerdict::Unknown
        } else {
            self.bucket(clamped)
        };

        if reasons.is_empty() {
            reasons.push("No risk signals detected".to_string());
        }

        debug!(score = clamped, verdict = verdict.as_str(), "scored launch");

        ScoredToken {
            mint: Some(mint.to_string()),
            platform_url: Some(format!("{}/{}", self.config.platform_base_url, mint)),
            first_seen: iso8601(event.timestamp.unwrap_or(now)),
            source: self.config.source_label.clone(),
            name: event.name.clone(),
            symbol: event.symbol.clone(),
            uri: event.uri.clone(),
            score: clamped,
            verdict,
            reasons,
            signals,
        }
    }

    fn bucket(&self, score: u8) -> LaunchVerdict {
        if score <= self.config.clean_max_score {
            LaunchVerdict::CleanIsh
        } else if score <= self.config.caution_max_score {
            LaunchVerdict::Caution
        } else {
            LaunchVerdict::HighRisk
        }
    }

    /// Worst-case record for a terminal malformation.
    fn terminal(
        &self,
        event: &LaunchEvent,
        now: i64,
        reason: &str,
        signal: &str,
    ) -> ScoredToken {
        let mut signals = HashMap::new();
        signals.insert("terminal".into(), json!(signal));
        ScoredToken {
            mint: event.mint.clone(),
            platform_url: event
                .mint
                .as_deref()
                .map(|m| format!("{}/{}", self.config.platform_base_url, m)),
            first_seen: iso8601(event.timestamp.unwrap_or(now)),
            source: self.config.source_label.clone(),
            name: event.name.clone(),
            symbol: event.symbol.clone(),
            uri: event.uri.clone(),
            score: 100,
            verdict: LaunchVerdict::Unknown,
            reasons: vec![reason.to_string()],
            signals,
        }
    }

    /// Synthetic record substituted when scoring one item panicked.
    fn worst_case(&self, event: &LaunchEvent, now: i64, message: String) -> ScoredToken {
        let mut record = self.terminal(event, now, &format!("Scoring failed: {}", message), "scoring_panic");
        record.verdict = LaunchVerdict::Unknown;
        record
    }
}

/// Build the per-batch creator frequency map.
pub fn build_creator_frequency(events: &[LaunchEvent]) -> CreatorFrequencyMap {
    let mut freq = CreatorFrequencyMap::new();
    for event in events {
        if let Some(creator) = event.creator_hex.as_deref().filter(|c| !c.is_empty()) {
            *freq.entry(creator.to_string()).or_insert(0) += 1;
        }
    }
    freq
}

/// Creators of the `window` newest launches (events assumed newest first).
pub fn recent_creators(events: &[LaunchEvent], window: usize) -> HashSet<String> {
    events
        .iter()
        .take(window)
        .filter_map(|e| e.creator_hex.clone())
        .collect()
}

fn iso8601(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
