//! Combination of module outputs into one `AnalysisResult`.
//!
//! Fixed-weight score combination, flag normalization and deduplication, the
//! ordered verdict decision tree, timing notes, and reason selection all live
//! here. Pure and synchronous: once the bundle is in hand nothing suspends.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{TimeZone, Utc};
use tracing::{debug, instrument, warn};

use crate::analyzer::flag_info::flag_info;
use crate::analyzer::modules::{default_modules, ScoringModule};
use crate::analyzer::types::{
    module_keys, AnalysisResult, AnalyzerConfig, ConfidenceLevel, DataQuality, FlagStatus,
    ModuleFlag, ModuleResult, ModuleSummary, RiskFlag, Severity, SignalBundle, TokenDisplay,
    Verdict, CRITICAL_FLAG_KEYS, LP_FLAG_PRIORITY,
};

/// Multi-module token analyzer.
pub struct TokenAnalyzer {
    config: AnalyzerConfig,
    modules: Vec<Box<dyn ScoringModule>>,
}

impl TokenAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            modules: default_modules(),
        }
    }

    /// Build with a custom module set (tests swap in fixed-output modules).
    pub fn with_modules(config: AnalyzerConfig, modules: Vec<Box<dyn ScoringModule>>) -> Self {
        Self { config, modules }
    }

    /// Analyze one token against its signal bundle, using the wall clock.
    pub fn analyze(&self, address: &str, bundle: &SignalBundle) -> AnalysisResult {
        self.analyze_at(address, bundle, Utc::now().timestamp())
    }

    /// Analyze with an explicit `now` (unix seconds).
    #[instrument(skip(self, bundle), fields(address = %address))]
    pub fn analyze_at(&self, address: &str, bundle: &SignalBundle, now: i64) -> AnalysisResult {
        let results = self.run_modules(bundle, now);

        let weighted_score = self.weighted_score(&results);
        let age_hours = bundle.age_hours(now);
        let is_very_new = age_hours.is_some_and(|a| a < self.config.very_new_hours);
        let avg_confidence = self.average_confidence(&results, is_very_new);
        let data_quality = self.data_quality(bundle);

        let risk_flags = aggregate_flags(
            results
                .iter()
                .flat_map(|(_, r)| r.flags.iter().cloned())
                .collect(),
        );
        let has_critical = risk_flags.iter().any(|f| f.severity == Severity::Critical);
        let has_verified_critical = risk_flags
            .iter()
            .any(|f| f.severity == Severity::Critical && f.status == FlagStatus::Verified);

        let scores = ModuleScores::from_results(&results);
        let (verdict, mut confidence, mut timing_note) = self.decide(
            weighted_score,
            avg_confidence,
            &scores,
            &risk_flags,
            has_critical,
            has_verified_critical,
            data_quality,
            is_very_new,
        );

        // Partial data never supports full conviction.
        if data_quality == DataQuality::Partial && confidence == ConfidenceLevel::High {
            confidence = ConfidenceLevel::Medium;
        }
        // Fresh launches on the tracked platform stay volatile no matter what
        // the modules say.
        let on_tracked_platform = bundle
            .platform
            .as_deref()
            .is_some_and(|p| p == self.config.tracked_platform);
        if on_tracked_platform && is_very_new && verdict == Verdict::Enter {
            if confidence == ConfidenceLevel::High {
                confidence = ConfidenceLevel::Medium;
            }
            if timing_note.is_none() {
                timing_note =
                    Some("Very new launch on a high-churn platform; expect violent swings".to_string());
            }
        }

        let reasons = self.select_reasons(verdict, avg_confidence, data_quality, &results);

        let modules = results
            .iter()
            .map(|(key, r)| ModuleSummary {
                module: (*key).to_string(),
                score: r.score,
                confidence: r.confidence,
            })
            .collect();

        let token_info = bundle.chain.as_ref().and_then(|c| c.token_info.as_ref());
        let token = TokenDisplay {
            name: token_info.and_then(|t| t.name.clone()),
            symbol: token_info.and_then(|t| t.symbol.clone()),
            age_hours,
        };

        debug!(
            verdict = verdict.as_str(),
            weighted = weighted_score,
            avg_confidence,
            "analysis complete"
        );

        AnalysisResult {
            address: address.to_string(),
            verdict,
            confidence,
            reasons,
            risk_flags,
            timing_note,
            data_quality,
            modules,
            token,
            timestamp: Utc
                .timestamp_opt(now, 0)
                .single()
                .unwrap_or_else(Utc::now)
                .to_rfc3339(),
        }
    }

    /// Run every module, isolating panics into synthetic worst-case results.
    fn run_modules(&self, bundle: &SignalBundle, now: i64) -> Vec<(&'static str, ModuleResult)> {
        self.modules
            .iter()
            .map(|module| {
                let key = module.key();
                let result = catch_unwind(AssertUnwindSafe(|| module.evaluate(bundle, now)))
                    .unwrap_or_else(|panic| {
                        let message = panic_message(panic);
                        warn!("module {} panicked: {}", key, message);
                        let mut fallback = ModuleResult::new(0.0, 0.1);
                        fallback.reasons = vec![format!("{} module failed: {}", key, message)];
                        fallback
                    });
                (key, result)
            })
            .collect()
    }

    fn weighted_score(&self, results: &[(&'static str, ModuleResult)]) -> f64 {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for (key, result) in results {
            let weight = self.config.weights.for_key(key);
            weighted_sum += result.score * weight;
            total_weight += weight;
        }
        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            50.0
        }
    }

    fn average_confidence(
        &self,
        results: &[(&'static str, ModuleResult)],
        is_very_new: bool,
    ) -> f64 {
        if results.is_empty() {
            return 0.0;
        }
        let mean =
            results.iter().map(|(_, r)| r.confidence).sum::<f64>() / results.len() as f64;
        if is_very_new {
            mean.min(self.config.very_new_confidence_cap)
        } else {
            mean
        }
    }

    /// Point budget: primary on-chain provider up to 3 (success, token info,
    /// holder distribution), market provider up to 2 (success, lp lock).
    fn data_quality(&self, bundle: &SignalBundle) -> DataQuality {
        let mut achieved = 0u32;
        let total = 5u32;
        if let Some(chain) = &bundle.chain {
            if chain.success {
                achieved += 1;
            }
            if chain.token_info.is_some() {
                achieved += 1;
            }
            if chain.holders.is_some() {
                achieved += 1;
            }
        }
        if let Some(market) = &bundle.market {
            if market.success {
                achieved += 1;
            }
            if market.lp_lock.is_some() {
                achieved += 1;
            }
        }
        if achieved as f64 / total as f64 >= self.config.data_quality_full_ratio {
            DataQuality::Full
        } else {
            DataQuality::Partial
        }
    }

    /// Ordered decision tree; first matching row wins.
    #[allow(clippy::too_many_arguments)]
    fn decide(
        &self,
        weighted: f64,
        avg_conf: f64,
        scores: &ModuleScores,
        flags: &[RiskFlag],
        has_critical: bool,
        has_verified_critical: bool,
        data_quality: DataQuality,
        is_very_new: bool,
    ) -> (Verdict, ConfidenceLevel, Option<String>) {
        let cfg = &self.config;

        // 1. Verified critical flag: nothing else matters.
        if has_verified_critical {
            let level = if avg_conf >= cfg.conf_high {
                ConfidenceLevel::High
            } else {
                ConfidenceLevel::Medium
            };
            return (
                Verdict::Exit,
                level,
                Some("A critical risk has been independently verified".to_string()),
            );
        }

        // 2. Rug narrative collapsed.
        if scores.rug < cfg.exit_rug_score_below {
            let level = if avg_conf >= cfg.exit_rug_conf_high {
                ConfidenceLevel::High
            } else {
                ConfidenceLevel::Medium
            };
            return (
                Verdict::Exit,
                level,
                Some("Liquidity picture points at an exit scam".to_string()),
            );
        }

        // 3. Manufactured volume.
        let has_manipulation_flag = flags
            .iter()
            .any(|f| matches!(f.key.as_str(), "circular_trading" | "wash_trading" | "bot_pattern"));
        if scores.fake < cfg.exit_fake_score_below && has_manipulation_flag {
            return (
                Verdict::Exit,
                ConfidenceLevel::Medium,
                Some("The volume behind this move looks manufactured".to_string()),
            );
        }

        // 4. Everything aligned: enter.
        if weighted >= cfg.enter_weighted_min
            && scores.fake >= cfg.enter_fake_min
            && scores.late >= cfg.enter_late_min
            && scores.rug >= cfg.enter_rug_min
            && !has_critical
            && data_quality == DataQuality::Full
        {
            let level = if is_very_new {
                ConfidenceLevel::Low
            } else if avg_conf >= cfg.conf_high {
                ConfidenceLevel::High
            } else if avg_conf >= cfg.conf_medium {
                ConfidenceLevel::Medium
            } else {
                ConfidenceLevel::Low
            };
            return (Verdict::Enter, level, None);
        }

        // 5. Promising but unsettled: wait.
        if weighted >= cfg.wait_weighted_min
            && scores.rug >= cfg.wait_rug_min
            && (scores.late < cfg.wait_late_below || scores.fake >= cfg.wait_fake_min)
        {
            let level = if avg_conf >= cfg.wait_conf_medium {
                ConfidenceLevel::Medium
            } else {
                ConfidenceLevel::Low
            };
            let note = if scores.late < cfg.wait_late_below {
                "The move may already be over; wait for a pullback"
            } else if scores.fake < cfg.enter_fake_min {
                "Volume quality unclear; wait for organic confirmation"
            } else if is_very_new {
                "Too early to judge; give it a few hours"
            } else {
                "Mixed signals; re-check after the next volume window"
            };
            return (Verdict::Wait, level, Some(note.to_string()));
        }

        // 6. Default.
        let level = if avg_conf >= cfg.wait_conf_medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };
        (Verdict::Ignore, level, None)
    }

    /// Pool, filter, rank, dedup, and cap module reasons.
    fn select_reasons(
        &self,
        verdict: Verdict,
        avg_confidence: f64,
        data_quality: DataQuality,
        results: &[(&'static str, ModuleResult)],
    ) -> Vec<String> {
        let cfg = &self.config;

        struct Candidate<'a> {
            module: &'static str,
            score: f64,
            confidence: f64,
            text: &'a str,
        }

        let mut pool: Vec<Candidate> = results
            .iter()
            .flat_map(|(key, r)| {
                r.reasons.iter().map(move |text| Candidate {
                    module: key,
                    score: r.score,
                    confidence: r.confidence,
                    text,
                })
            })
            .filter(|c| c.confidence >= cfg.reason_min_confidence)
            .collect();

        let relevance = |c: &Candidate| -> f64 {
            let base = c.confidence * cfg.weights.for_key(c.module);
            match verdict {
                Verdict::Exit => {
                    let priority = matches!(
                        c.module,
                        module_keys::RUG_NARRATIVE | module_keys::FAKE_MOVE
                    );
                    if priority {
                        base + 10.0
                    } else {
                        base
                    }
                }
                Verdict::Enter => {
                    if c.score >= cfg.enter_reason_score_min {
                        base + 10.0
                    } else {
                        base
                    }
                }
                _ => base,
            }
        };

        pool.sort_by(|a, b| {
            relevance(b)
                .partial_cmp(&relevance(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Cheap near-duplicate detection on the lowercase prefix.
        let mut seen_prefixes: Vec<String> = Vec::new();
        let mut selected: Vec<String> = Vec::new();
        for candidate in &pool {
            let prefix: String = candidate
                .text
                .to_lowercase()
                .chars()
                .take(cfg.reason_dedup_prefix_len)
                .collect();
            if seen_prefixes.contains(&prefix) {
                continue;
            }
            seen_prefixes.push(prefix);
            selected.push(candidate.text.to_string());
            if selected.len() >= cfg.reasons_max {
                break;
            }
        }

        if selected.len() < cfg.reasons_min {
            selected.push(filler_reason(verdict).to_string());
        }
        // Backstop so the result always carries at least the minimum count.
        if selected.len() < cfg.reasons_min {
            selected.push(match data_quality {
                DataQuality::Full => "All signal providers responded".to_string(),
                DataQuality::Partial => "Some signal providers did not respond".to_string(),
            });
        }
        if selected.len() < cfg.reasons_min {
            selected.push(format!(
                "Overall signal confidence {:.0}%",
                avg_confidence * 100.0
            ));
        }

        selected.truncate(cfg.reasons_max);
        selected
    }
}

impl Default for TokenAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Module scores the decision tree keys on, defaulting to neutral when a
/// module is absent from the set.
struct ModuleScores {
    fake: f64,
    late: f64,
    rug: f64,
}

impl ModuleScores {
    fn from_results(results: &[(&'static str, ModuleResult)]) -> Self {
        let score_of = |key: &str| {
            results
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, r)| r.score)
                .unwrap_or(50.0)
        };
        Self {
            fake: score_of(module_keys::FAKE_MOVE),
            late: score_of(module_keys::TOO_LATE),
            rug: score_of(module_keys::RUG_NARRATIVE),
        }
    }
}

fn filler_reason(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Enter => "Signals align but position sizing should stay conservative",
        Verdict::Wait => "Not enough resolved signals to act yet",
        Verdict::Ignore => "Nothing here stands out against the base rate",
        Verdict::Exit => "Accumulated risk outweighs any remaining upside",
    }
}

/// Normalize, apply LP mutual exclusion, deduplicate by key, and sort.
pub fn aggregate_flags(raw: Vec<ModuleFlag>) -> Vec<RiskFlag> {
    let normalized: Vec<RiskFlag> = raw.into_iter().map(normalize_flag).collect();

    // Liquidity-lock flags are mutually exclusive: keep only the highest
    // priority one.
    let mut lp_best: Option<RiskFlag> = None;
    let mut others: Vec<RiskFlag> = Vec::new();
    for flag in normalized {
        if let Some(priority) = lp_priority(&flag.key) {
            let replace = match &lp_best {
                None => true,
                Some(current) => {
                    let current_priority =
                        lp_priority(&current.key).unwrap_or(LP_FLAG_PRIORITY.len());
                    priority < current_priority
                }
            };
            if replace {
                lp_best = Some(flag);
            }
        } else {
            others.push(flag);
        }
    }

    // Deduplicate the rest by key: higher severity wins, then confidence.
    let mut merged: Vec<RiskFlag> = Vec::new();
    for flag in others {
        match merged.iter_mut().find(|f| f.key == flag.key) {
            None => merged.push(flag),
            Some(existing) => {
                let better = flag.severity > existing.severity
                    || (flag.severity == existing.severity
                        && flag.confidence > existing.confidence);
                if better {
                    *existing = flag;
                }
            }
        }
    }
    if let Some(lp) = lp_best {
        merged.push(lp);
    }

    // Critical flags first, then descending confidence within each tier.
    merged.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then(
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    merged
}

/// Collapse a module-boundary flag to the canonical structured form.
pub fn normalize_flag(flag: ModuleFlag) -> RiskFlag {
    match flag {
        ModuleFlag::Structured(full) => full,
        ModuleFlag::Legacy(key) => {
            let severity = if CRITICAL_FLAG_KEYS.contains(&key.as_str()) {
                Severity::Critical
            } else {
                Severity::Warning
            };
            let info = flag_info(&key);
            RiskFlag {
                label: info
                    .map(|i| i.title.to_string())
                    .unwrap_or_else(|| humanize_key(&key)),
                severity,
                confidence: 0.5,
                status: FlagStatus::Unverified,
                evidence: String::new(),
                verify_hint: info.map(|i| i.verify.to_string()),
                key,
            }
        }
    }
}

fn lp_priority(key: &str) -> Option<usize> {
    LP_FLAG_PRIORITY.iter().position(|k| *k == key)
}

fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000;

    /// A module with a fixed output, for driving the decision tree directly.
    struct Fixed {
        key: &'static str,
        result: ModuleResult,
    }

    impl ScoringModule for Fixed {
        fn key(&self) -> &'static str {
            self.key
        }
        fn evaluate(&self, _bundle: &SignalBundle, _now: i64) -> ModuleResult {
            self.result.clone()
        }
    }

    struct Panics;
    impl ScoringModule for Panics {
        fn key(&self) -> &'static str {
            "panics"
        }
        fn evaluate(&self, _bundle: &SignalBundle, _now: i64) -> ModuleResult {
            panic!("boom");
        }
    }

    fn fixed(key: &'static str, score: f64, confidence: f64) -> Box<dyn ScoringModule> {
        let mut result = ModuleResult::new(score, confidence);
        result.reasons = vec![format!("{} reports score {:.0}", key, score)];
        Box::new(Fixed { key, result })
    }

    fn fixed_with_flags(
        key: &'static str,
        score: f64,
        confidence: f64,
        flags: Vec<ModuleFlag>,
    ) -> Box<dyn ScoringModule> {
        let mut result = ModuleResult::new(score, confidence);
        result.reasons = vec![format!("{} reports score {:.0}", key, score)];
        result.flags = flags;
        Box::new(Fixed { key, result })
    }

    fn full_quality_bundle() -> SignalBundle {
        use crate::analyzer::types::*;
        SignalBundle {
            address: "mint".to_string(),
            platform: Some("pump.fun".to_string()),
            created_at: Some(NOW - 48 * 3600),
            chain: Some(ChainProviderData {
                success: true,
                token_info: Some(TokenInfo::default()),
                holders: Some(HolderDistribution::default()),
            }),
            market: Some(MarketProviderData {
                success: true,
                lp_lock: Some(LpLockInfo {
                    status: LpLockStatus::Locked,
                    locked_pct: Some(100.0),
                    checked_at: Some(NOW),
                }),
                ..MarketProviderData::default()
            }),
        }
    }

    fn analyzer_with(modules: Vec<Box<dyn ScoringModule>>) -> TokenAnalyzer {
        TokenAnalyzer::with_modules(AnalyzerConfig::default(), modules)
    }

    fn all_good_modules(confidence: f64) -> Vec<Box<dyn ScoringModule>> {
        vec![
            fixed(module_keys::WORTH_ATTENTION, 80.0, confidence),
            fixed(module_keys::FAKE_MOVE, 75.0, confidence),
            fixed(module_keys::TOO_LATE, 70.0, confidence),
            fixed(module_keys::DEAD_OR_SLEEPING, 80.0, confidence),
            fixed(module_keys::HOLDER_PSYCHOLOGY, 75.0, confidence),
            fixed(module_keys::RUG_NARRATIVE, 80.0, confidence),
        ]
    }

    #[test]
    fn test_aligned_signals_enter_high() {
        let analyzer = analyzer_with(all_good_modules(0.9));
        let result = analyzer.analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Enter);
        assert_eq!(result.confidence, ConfidenceLevel::High);
        assert_eq!(result.data_quality, DataQuality::Full);
    }

    #[test]
    fn test_verified_critical_flag_forces_exit() {
        let mut modules = all_good_modules(0.9);
        modules[5] = fixed_with_flags(
            module_keys::RUG_NARRATIVE,
            80.0,
            0.9,
            vec![ModuleFlag::Structured(RiskFlag {
                key: "honeypot_sell_block".to_string(),
                label: "Possible honeypot".to_string(),
                severity: Severity::Critical,
                confidence: 0.9,
                status: FlagStatus::Verified,
                evidence: "test".to_string(),
                verify_hint: None,
            })],
        );
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Exit);
        assert_eq!(result.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_low_rug_score_beats_enter_conditions() {
        // Satisfies every ENTER condition except the rug module collapsed;
        // the EXIT row has higher priority.
        let mut modules = all_good_modules(0.9);
        modules[5] = fixed(module_keys::RUG_NARRATIVE, 20.0, 0.9);
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Exit);
        assert_eq!(result.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_fake_move_with_manipulation_flag_exits() {
        let mut modules = all_good_modules(0.9);
        modules[1] = fixed_with_flags(
            module_keys::FAKE_MOVE,
            20.0,
            0.9,
            vec![ModuleFlag::Legacy("wash_trading".to_string())],
        );
        // Keep the weighted score below the WAIT row so the EXIT row is the
        // discriminating one.
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Exit);
        assert_eq!(result.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_partial_data_blocks_enter() {
        let analyzer = analyzer_with(all_good_modules(0.9));
        let mut bundle = full_quality_bundle();
        bundle.market = None; // drops 2 of 5 quality points
        let result = analyzer.analyze_at("mint", &bundle, NOW);
        assert_eq!(result.data_quality, DataQuality::Partial);
        assert_ne!(result.verdict, Verdict::Enter);
        // Partial data also caps confidence below HIGH.
        assert!(result.confidence < ConfidenceLevel::High);
    }

    #[test]
    fn test_very_new_token_never_high_confidence() {
        let analyzer = analyzer_with(all_good_modules(1.0));
        let mut bundle = full_quality_bundle();
        bundle.created_at = Some(NOW - 3600); // one hour old
        let result = analyzer.analyze_at("mint", &bundle, NOW);
        assert!(result.confidence < ConfidenceLevel::High);
    }

    #[test]
    fn test_wait_when_move_already_happened() {
        let mut modules = all_good_modules(0.9);
        // Good weighted score, but entry window closed.
        modules[2] = fixed(module_keys::TOO_LATE, 30.0, 0.9);
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Wait);
        assert!(result
            .timing_note
            .as_deref()
            .is_some_and(|n| n.contains("pullback")));
    }

    #[test]
    fn test_wait_on_unclear_volume_quality() {
        let mut modules = all_good_modules(0.9);
        // Entry window still open, but volume quality sits in the band that
        // blocks ENTER without suggesting outright manipulation.
        modules[1] = fixed(module_keys::FAKE_MOVE, 50.0, 0.9);
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Wait);
        assert!(result
            .timing_note
            .as_deref()
            .is_some_and(|n| n.contains("Volume quality")));
    }

    #[test]
    fn test_default_is_ignore() {
        let modules = vec![
            fixed(module_keys::WORTH_ATTENTION, 30.0, 0.4),
            fixed(module_keys::FAKE_MOVE, 40.0, 0.4),
            fixed(module_keys::TOO_LATE, 60.0, 0.4),
            fixed(module_keys::DEAD_OR_SLEEPING, 30.0, 0.4),
            fixed(module_keys::HOLDER_PSYCHOLOGY, 40.0, 0.4),
            fixed(module_keys::RUG_NARRATIVE, 50.0, 0.4),
        ];
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert_eq!(result.verdict, Verdict::Ignore);
        assert_eq!(result.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_reason_count_always_three_to_five() {
        // Low-confidence modules: every pooled reason is filtered out, the
        // fillers must still bring the count up to three.
        let modules = vec![
            fixed(module_keys::WORTH_ATTENTION, 50.0, 0.1),
            fixed(module_keys::FAKE_MOVE, 50.0, 0.1),
            fixed(module_keys::RUG_NARRATIVE, 50.0, 0.1),
        ];
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        assert!(result.reasons.len() >= 3 && result.reasons.len() <= 5);

        let result = analyzer_with(all_good_modules(0.9)).analyze_at(
            "mint",
            &full_quality_bundle(),
            NOW,
        );
        assert!(result.reasons.len() >= 3 && result.reasons.len() <= 5);
    }

    #[test]
    fn test_module_panic_is_isolated() {
        let mut modules = all_good_modules(0.9);
        modules.push(Box::new(Panics));
        let result = analyzer_with(modules).analyze_at("mint", &full_quality_bundle(), NOW);
        // Analysis still completes; the panicking module reports worst case.
        let failed = result
            .modules
            .iter()
            .find(|m| m.module == "panics")
            .expect("panicking module still summarized");
        assert_eq!(failed.score, 0.0);
    }

    #[test]
    fn test_weighted_score_uses_fixed_weights() {
        let analyzer = analyzer_with(vec![]);
        let results = vec![
            (module_keys::FAKE_MOVE, ModuleResult::new(100.0, 1.0)),
            (module_keys::DEAD_OR_SLEEPING, ModuleResult::new(0.0, 1.0)),
        ];
        // (100*0.25 + 0*0.10) / 0.35 = 71.43
        let weighted = analyzer.weighted_score(&results);
        assert!((weighted - 71.43).abs() < 0.01);
    }

    // ---- flag aggregation ----

    fn lp_flag(key: &str, confidence: f64) -> ModuleFlag {
        ModuleFlag::Structured(RiskFlag {
            key: key.to_string(),
            label: key.to_string(),
            severity: Severity::Critical,
            confidence,
            status: FlagStatus::Unverified,
            evidence: String::new(),
            verify_hint: None,
        })
    }

    #[test]
    fn test_lp_flags_mutually_exclusive() {
        let flags = aggregate_flags(vec![
            ModuleFlag::Legacy("lp_stale".to_string()),
            lp_flag("lp_unlocked", 0.9),
        ]);
        let lp: Vec<&RiskFlag> = flags.iter().filter(|f| f.key.starts_with("lp_")).collect();
        assert_eq!(lp.len(), 1);
        assert_eq!(lp[0].key, "lp_unlocked");
    }

    #[test]
    fn test_lp_priority_beats_confidence() {
        // lp_stale has higher confidence but lower priority.
        let flags = aggregate_flags(vec![lp_flag("lp_stale", 0.99), lp_flag("lp_unlocked", 0.2)]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].key, "lp_unlocked");
    }

    #[test]
    fn test_duplicate_keys_keep_higher_severity() {
        let warning = ModuleFlag::Structured(RiskFlag {
            key: "whale_concentration".to_string(),
            label: "w".to_string(),
            severity: Severity::Warning,
            confidence: 0.9,
            status: FlagStatus::Verified,
            evidence: String::new(),
            verify_hint: None,
        });
        let critical = ModuleFlag::Structured(RiskFlag {
            key: "whale_concentration".to_string(),
            label: "c".to_string(),
            severity: Severity::Critical,
            confidence: 0.5,
            status: FlagStatus::Unverified,
            evidence: String::new(),
            verify_hint: None,
        });
        let flags = aggregate_flags(vec![warning, critical]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].severity, Severity::Critical);
    }

    #[test]
    fn test_duplicate_keys_tie_on_severity_keep_higher_confidence() {
        let low = ModuleFlag::Structured(RiskFlag {
            key: "bot_pattern".to_string(),
            label: "low".to_string(),
            severity: Severity::Critical,
            confidence: 0.4,
            status: FlagStatus::Unverified,
            evidence: String::new(),
            verify_hint: None,
        });
        let high = ModuleFlag::Structured(RiskFlag {
            key: "bot_pattern".to_string(),
            label: "high".to_string(),
            severity: Severity::Critical,
            confidence: 0.8,
            status: FlagStatus::Unverified,
            evidence: String::new(),
            verify_hint: None,
        });
        let flags = aggregate_flags(vec![low, high]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].label, "high");
    }

    #[test]
    fn test_sort_critical_first_then_confidence() {
        let mk = |key: &str, severity, confidence| {
            ModuleFlag::Structured(RiskFlag {
                key: key.to_string(),
                label: key.to_string(),
                severity,
                confidence,
                status: FlagStatus::Unverified,
                evidence: String::new(),
                verify_hint: None,
            })
        };
        let flags = aggregate_flags(vec![
            mk("low_liquidity", Severity::Warning, 0.9),
            mk("wash_trading", Severity::Critical, 0.5),
            mk("whale_concentration", Severity::Critical, 0.8),
        ]);
        assert_eq!(flags[0].key, "whale_concentration");
        assert_eq!(flags[1].key, "wash_trading");
        assert_eq!(flags[2].key, "low_liquidity");
    }

    #[test]
    fn test_legacy_flag_normalization_defaults() {
        let flag = normalize_flag(ModuleFlag::Legacy("wash_trading".to_string()));
        assert_eq!(flag.severity, Severity::Critical); // in the critical set
        assert_eq!(flag.confidence, 0.5);
        assert_eq!(flag.status, FlagStatus::Unverified);

        let flag = normalize_flag(ModuleFlag::Legacy("low_liquidity".to_string()));
        assert_eq!(flag.severity, Severity::Warning);
    }
}
