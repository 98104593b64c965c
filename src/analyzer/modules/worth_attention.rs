//! Worth-attention screening: is this token interesting enough to look at?

use crate::analyzer::modules::ScoringModule;
use crate::analyzer::types::{module_keys, ModuleFlag, ModuleResult, SignalBundle};

/// Coarse screening over volume, trader breadth, and holder count.
pub struct WorthAttention;

impl ScoringModule for WorthAttention {
    fn key(&self) -> &'static str {
        module_keys::WORTH_ATTENTION
    }

    fn evaluate(&self, bundle: &SignalBundle, _now: i64) -> ModuleResult {
        let mut score: f64 = 50.0;
        let mut confidence: f64 = 0.3;
        let mut reasons = Vec::new();
        let mut flags = Vec::new();

        let volume = bundle.market.as_ref().and_then(|m| m.volume.as_ref());
        if let Some(vol) = volume {
            confidence += 0.25;
            match vol.vol_1h_usd {
                Some(v) if v >= 10_000.0 => {
                    score += 20.0;
                    reasons.push(format!("Strong hourly volume (${:.0})", v));
                }
                Some(v) if v >= 1_000.0 => {
                    score += 10.0;
                    reasons.push(format!("Moderate hourly volume (${:.0})", v));
                }
                Some(v) if v < 100.0 => {
                    score -= 15.0;
                    reasons.push("Hourly volume under $100".to_string());
                    flags.push(ModuleFlag::Legacy("low_liquidity".to_string()));
                }
                _ => {}
            }
            if let Some(traders) = vol.unique_traders_24h {
                confidence += 0.15;
                if traders >= 50 {
                    score += 10.0;
                    reasons.push(format!("{} unique traders in 24h", traders));
                } else if traders < 10 {
                    score -= 10.0;
                    reasons.push("Fewer than 10 unique traders in 24h".to_string());
                }
            }
        } else {
            reasons.push("No volume data; screening on holders only".to_string());
        }

        let holders = bundle.chain.as_ref().and_then(|c| c.holders.as_ref());
        if let Some(h) = holders {
            confidence += 0.2;
            match h.total_holders {
                Some(n) if n >= 100 => {
                    score += 10.0;
                    reasons.push(format!("{} holders", n));
                }
                Some(n) if n < 20 => {
                    score -= 10.0;
                    reasons.push(format!("Only {} holders", n));
                }
                _ => {}
            }
        }

        let mut result = ModuleResult::new(score, confidence);
        result.reasons = reasons;
        result.flags = flags;
        result
    }
}
