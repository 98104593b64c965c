//! Holder/whale psychology. Higher score = healthier distribution.

use crate::analyzer::modules::ScoringModule;
use crate::analyzer::types::{
    module_keys, FlagStatus, ModuleFlag, ModuleResult, RiskFlag, Severity, SignalBundle,
};

const WHALE_TOP10_CRITICAL_PCT: f64 = 80.0;
const WHALE_TOP10_WARNING_PCT: f64 = 60.0;
const CREATOR_HOLDING_WARNING_PCT: f64 = 20.0;

/// Concentration analysis of the holder distribution.
pub struct HolderPsychology;

impl ScoringModule for HolderPsychology {
    fn key(&self) -> &'static str {
        module_keys::HOLDER_PSYCHOLOGY
    }

    fn evaluate(&self, bundle: &SignalBundle, _now: i64) -> ModuleResult {
        let holders = bundle.chain.as_ref().and_then(|c| c.holders.as_ref());

        let mut score: f64 = 60.0;
        let mut confidence: f64 = if holders.is_some() { 0.75 } else { 0.25 };
        let mut reasons = Vec::new();
        let mut flags = Vec::new();

        if let Some(h) = holders {
            if let Some(top10) = h.top10_pct {
                if top10 >= WHALE_TOP10_CRITICAL_PCT {
                    score -= 40.0;
                    reasons.push(format!("Top 10 wallets hold {:.0}% of supply", top10));
                    flags.push(ModuleFlag::Structured(RiskFlag {
                        key: "whale_concentration".to_string(),
                        label: "Extreme whale concentration".to_string(),
                        severity: Severity::Critical,
                        confidence: 0.9,
                        status: FlagStatus::Verified,
                        evidence: format!("top 10 holders own {:.1}%", top10),
                        verify_hint: Some("check the holder tab on a token explorer".to_string()),
                    }));
                } else if top10 >= WHALE_TOP10_WARNING_PCT {
                    score -= 20.0;
                    reasons.push(format!("Top 10 wallets hold {:.0}% of supply", top10));
                    flags.push(ModuleFlag::Structured(RiskFlag {
                        key: "whale_concentration".to_string(),
                        label: "High whale concentration".to_string(),
                        severity: Severity::Warning,
                        confidence: 0.8,
                        status: FlagStatus::Verified,
                        evidence: format!("top 10 holders own {:.1}%", top10),
                        verify_hint: Some("check the holder tab on a token explorer".to_string()),
                    }));
                } else if top10 <= 30.0 {
                    score += 15.0;
                    reasons.push("Supply is well distributed".to_string());
                }
            }
            if let Some(creator_pct) = h.creator_pct {
                if creator_pct >= CREATOR_HOLDING_WARNING_PCT {
                    score -= 15.0;
                    reasons.push(format!("Creator still holds {:.0}%", creator_pct));
                    flags.push(ModuleFlag::Legacy("creator_dumping".to_string()));
                }
            }
            if let Some(total) = h.total_holders {
                if total < 20 {
                    score -= 10.0;
                    reasons.push(format!("Only {} holders in total", total));
                } else if total >= 500 {
                    score += 10.0;
                    reasons.push(format!("{} holders", total));
                }
            }
            if reasons.is_empty() {
                reasons.push("Holder distribution unremarkable".to_string());
            }
        } else {
            reasons.push("No holder distribution data".to_string());
        }

        let mut result = ModuleResult::new(score, confidence);
        result.reasons = reasons;
        result.flags = flags;
        result
    }
}
