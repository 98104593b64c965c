//! Rug/liquidity narrative risk. Higher score = safer.
//!
//! Centered on the liquidity-pool lock status; an unlocked pool is the single
//! strongest exit-scam indicator this system knows about.

use crate::analyzer::modules::ScoringModule;
use crate::analyzer::types::{
    module_keys, FlagStatus, LpLockStatus, ModuleFlag, ModuleResult, RiskFlag, Severity,
    SignalBundle,
};

/// Lock observations older than this count as stale.
const LOCK_FRESH_SECS: i64 = 24 * 3600;

/// Liquidity-lock and honeypot heuristics.
pub struct RugNarrative;

impl ScoringModule for RugNarrative {
    fn key(&self) -> &'static str {
        module_keys::RUG_NARRATIVE
    }

    fn evaluate(&self, bundle: &SignalBundle, now: i64) -> ModuleResult {
        let lp_lock = bundle.market.as_ref().and_then(|m| m.lp_lock.as_ref());
        let volume = bundle.market.as_ref().and_then(|m| m.volume.as_ref());
        let holders = bundle.chain.as_ref().and_then(|c| c.holders.as_ref());

        let mut reasons = Vec::new();
        let mut flags = Vec::new();

        let (mut score, mut confidence): (f64, f64) = match lp_lock {
            Some(info) => {
                let fresh = info
                    .checked_at
                    .is_some_and(|at| now - at <= LOCK_FRESH_SECS);
                match info.status {
                    LpLockStatus::Locked => {
                        reasons.push(match info.locked_pct {
                            Some(pct) => format!("Liquidity locked ({:.0}%)", pct),
                            None => "Liquidity locked".to_string(),
                        });
                        (80.0, 0.85)
                    }
                    LpLockStatus::Unlocked => {
                        reasons.push("Liquidity is NOT locked".to_string());
                        flags.push(ModuleFlag::Structured(RiskFlag {
                            key: "lp_unlocked".to_string(),
                            label: "Liquidity unlocked".to_string(),
                            severity: Severity::Critical,
                            confidence: if fresh { 0.9 } else { 0.6 },
                            status: if fresh {
                                FlagStatus::Verified
                            } else {
                                FlagStatus::Stale
                            },
                            evidence: "no lock found for the trading pool".to_string(),
                            verify_hint: Some("check the LP token holders for a locker contract".to_string()),
                        }));
                        (15.0, 0.85)
                    }
                    LpLockStatus::Mixed => {
                        reasons.push("Liquidity only partially locked".to_string());
                        flags.push(ModuleFlag::Structured(RiskFlag {
                            key: "lp_mixed".to_string(),
                            label: "Mixed liquidity lock".to_string(),
                            severity: Severity::Warning,
                            confidence: 0.7,
                            status: FlagStatus::Ambiguous,
                            evidence: match info.locked_pct {
                                Some(pct) => format!("{:.0}% of liquidity locked", pct),
                                None => "lock coverage varies across pools".to_string(),
                            },
                            verify_hint: Some("compare lock coverage across every pool".to_string()),
                        }));
                        (40.0, 0.7)
                    }
                    LpLockStatus::Stale => {
                        reasons.push("Liquidity lock data is outdated".to_string());
                        flags.push(ModuleFlag::Structured(RiskFlag {
                            key: "lp_stale".to_string(),
                            label: "Stale liquidity lock data".to_string(),
                            severity: Severity::Warning,
                            confidence: 0.5,
                            status: FlagStatus::Stale,
                            evidence: "last lock observation is old".to_string(),
                            verify_hint: Some("re-check the lock status directly on-chain".to_string()),
                        }));
                        (45.0, 0.5)
                    }
                    LpLockStatus::Unverified => {
                        reasons.push("Liquidity lock could not be verified".to_string());
                        flags.push(ModuleFlag::Legacy("lp_unverified".to_string()));
                        (50.0, 0.45)
                    }
                    LpLockStatus::Unknown => {
                        reasons.push("Liquidity lock status unknown".to_string());
                        flags.push(ModuleFlag::Legacy("lp_unknown".to_string()));
                        (50.0, 0.35)
                    }
                }
            }
            None => {
                reasons.push("No liquidity lock data at all".to_string());
                flags.push(ModuleFlag::Legacy("lp_unknown".to_string()));
                (50.0, 0.3)
            }
        };

        // Buys without a single sell is the honeypot signature.
        if let Some(vol) = volume {
            if let (Some(buys), Some(sells)) = (vol.buy_count_24h, vol.sell_count_24h) {
                if buys >= 20 && sells == 0 {
                    score -= 25.0;
                    confidence = (confidence + 0.1).min(1.0);
                    reasons.push(format!("{} buys and zero sells in 24h", buys));
                    flags.push(ModuleFlag::Structured(RiskFlag {
                        key: "honeypot_sell_block".to_string(),
                        label: "Possible honeypot".to_string(),
                        severity: Severity::Critical,
                        confidence: 0.75,
                        status: FlagStatus::Unverified,
                        evidence: format!("{} buys, 0 sells", buys),
                        verify_hint: Some("attempt a minimal test sell".to_string()),
                    }));
                }
            }
        }

        if let Some(h) = holders {
            if h.creator_pct.is_some_and(|pct| pct >= 30.0) {
                score -= 10.0;
                reasons.push("Creator retains a large supply share".to_string());
            }
        }

        let mut result = ModuleResult::new(score, confidence);
        result.reasons = reasons;
        result.flags = flags;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::{LpLockInfo, MarketProviderData, VolumeStats};

    const NOW: i64 = 1_750_000_000;

    fn bundle_with_lock(status: LpLockStatus, checked_at: Option<i64>) -> SignalBundle {
        SignalBundle {
            address: "mint".to_string(),
            market: Some(MarketProviderData {
                success: true,
                lp_lock: Some(LpLockInfo {
                    status,
                    locked_pct: None,
                    checked_at,
                }),
                ..MarketProviderData::default()
            }),
            ..SignalBundle::default()
        }
    }

    #[test]
    fn test_locked_scores_safe() {
        let result = RugNarrative.evaluate(&bundle_with_lock(LpLockStatus::Locked, Some(NOW)), NOW);
        assert_eq!(result.score, 80.0);
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_unlocked_fresh_is_verified_critical() {
        let result =
            RugNarrative.evaluate(&bundle_with_lock(LpLockStatus::Unlocked, Some(NOW - 60)), NOW);
        assert_eq!(result.score, 15.0);
        let flag = match &result.flags[0] {
            ModuleFlag::Structured(f) => f,
            other => panic!("expected structured flag, got {:?}", other),
        };
        assert_eq!(flag.key, "lp_unlocked");
        assert_eq!(flag.severity, Severity::Critical);
        assert_eq!(flag.status, FlagStatus::Verified);
    }

    #[test]
    fn test_unlocked_old_observation_is_stale() {
        let result = RugNarrative.evaluate(
            &bundle_with_lock(LpLockStatus::Unlocked, Some(NOW - 3 * 24 * 3600)),
            NOW,
        );
        let flag = match &result.flags[0] {
            ModuleFlag::Structured(f) => f,
            other => panic!("expected structured flag, got {:?}", other),
        };
        assert_eq!(flag.status, FlagStatus::Stale);
    }

    #[test]
    fn test_missing_lock_data_emits_unknown() {
        let result = RugNarrative.evaluate(&SignalBundle::default(), NOW);
        assert!(result
            .flags
            .iter()
            .any(|f| matches!(f, ModuleFlag::Legacy(k) if k == "lp_unknown")));
        assert!(result.confidence <= 0.3);
    }

    #[test]
    fn test_honeypot_signature() {
        let mut bundle = bundle_with_lock(LpLockStatus::Locked, Some(NOW));
        bundle.market.as_mut().unwrap().volume = Some(VolumeStats {
            buy_count_24h: Some(50),
            sell_count_24h: Some(0),
            ..VolumeStats::default()
        });
        let result = RugNarrative.evaluate(&bundle, NOW);
        assert_eq!(result.score, 55.0);
        assert!(result
            .flags
            .iter()
            .any(|f| matches!(f, ModuleFlag::Structured(rf) if rf.key == "honeypot_sell_block")));
    }
}
