//! Dead-versus-dormant activity classification. Higher score = alive.

use crate::analyzer::modules::ScoringModule;
use crate::analyzer::types::{module_keys, ModuleFlag, ModuleResult, SignalBundle};

/// Hours after which a silent token counts as dead rather than sleeping.
const DEAD_AFTER_HOURS: f64 = 72.0;

/// Classifies inactivity: a quiet new token may be dormant, a quiet old one
/// is usually dead.
pub struct DeadOrSleeping;

impl ScoringModule for DeadOrSleeping {
    fn key(&self) -> &'static str {
        module_keys::DEAD_OR_SLEEPING
    }

    fn evaluate(&self, bundle: &SignalBundle, now: i64) -> ModuleResult {
        let volume = bundle.market.as_ref().and_then(|m| m.volume.as_ref());
        let age = bundle.age_hours(now);

        let mut reasons = Vec::new();
        let mut flags = Vec::new();

        let (score, confidence) = match volume {
            None => {
                reasons.push("No volume data; cannot tell dead from dormant".to_string());
                (40.0, 0.25)
            }
            Some(vol) => {
                let v5 = vol.vol_5m_usd.unwrap_or(0.0);
                let v1h = vol.vol_1h_usd.unwrap_or(0.0);
                let v24 = vol.vol_24h_usd.unwrap_or(0.0);
                let confidence = 0.8;

                if v5 <= 0.0 && v1h <= 0.0 {
                    if age.is_some_and(|a| a >= DEAD_AFTER_HOURS) && v24 < 100.0 {
                        reasons.push("No trades for days; token looks dead".to_string());
                        flags.push(ModuleFlag::Legacy("dead_pool".to_string()));
                        (15.0, confidence)
                    } else {
                        reasons.push("No recent trades; dormant".to_string());
                        (35.0, confidence)
                    }
                } else if v1h < 500.0 {
                    reasons.push("Trickle of recent activity".to_string());
                    (55.0, confidence)
                } else {
                    reasons.push(format!("Actively traded (${:.0}/h)", v1h));
                    (80.0, confidence)
                }
            }
        };

        let mut result = ModuleResult::new(score, confidence);
        result.reasons = reasons;
        result.flags = flags;
        result
    }
}
