//! "Already too late to enter" timing. Higher score = entry is still early.

use crate::analyzer::modules::ScoringModule;
use crate::analyzer::types::{module_keys, ModuleResult, SignalBundle};

/// Entry-timing heuristics over recent price action and distance from ATH.
pub struct TooLate;

impl ScoringModule for TooLate {
    fn key(&self) -> &'static str {
        module_keys::TOO_LATE
    }

    fn evaluate(&self, bundle: &SignalBundle, now: i64) -> ModuleResult {
        let price = bundle.market.as_ref().and_then(|m| m.price.as_ref());

        let mut score: f64 = 60.0;
        let mut confidence: f64 = if price.is_some() { 0.75 } else { 0.3 };
        let mut reasons = Vec::new();

        if let Some(p) = price {
            match p.change_24h_pct {
                Some(change) if change >= 300.0 => {
                    score -= 35.0;
                    reasons.push(format!("Already up {:.0}% in 24h", change));
                }
                Some(change) if change <= 30.0 && change >= -20.0 => {
                    score += 15.0;
                    reasons.push("Price has not run yet".to_string());
                }
                _ => {}
            }
            if let Some(change) = p.change_1h_pct {
                if change >= 100.0 {
                    score -= 20.0;
                    reasons.push(format!("Vertical move in the last hour (+{:.0}%)", change));
                }
            }
            if let Some(from_ath) = p.from_ath_pct {
                if from_ath >= -5.0 {
                    score -= 10.0;
                    reasons.push("Trading at or near all-time high".to_string());
                } else if from_ath <= -70.0 {
                    score -= 10.0;
                    reasons.push(format!("{:.0}% below all-time high", from_ath.abs()));
                }
            }
        } else {
            reasons.push("No price history; timing unclear".to_string());
        }

        // Nothing to be late for in the first minutes of a token's life.
        if let Some(age) = bundle.age_hours(now) {
            confidence = (confidence + 0.1).min(1.0);
            if age < 1.0 {
                score += 10.0;
                reasons.push("Token is under an hour old".to_string());
            }
        }

        let mut result = ModuleResult::new(score, confidence);
        result.reasons = reasons;
        result
    }
}
