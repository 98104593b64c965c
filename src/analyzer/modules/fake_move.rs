//! Wash/fake-volume detection. Higher score = more of the move looks genuine.

use crate::analyzer::modules::ScoringModule;
use crate::analyzer::types::{
    module_keys, FlagStatus, ModuleFlag, ModuleResult, RiskFlag, Severity, SignalBundle,
};

const WASH_RATIO_THRESHOLD: f64 = 0.6;
const CIRCULAR_RATIO_THRESHOLD: f64 = 0.3;
const BOT_RATIO_THRESHOLD: f64 = 0.5;

/// Trading-pattern forensics over repeated-wallet, circular, and bot ratios.
pub struct FakeMove;

impl ScoringModule for FakeMove {
    fn key(&self) -> &'static str {
        module_keys::FAKE_MOVE
    }

    fn evaluate(&self, bundle: &SignalBundle, _now: i64) -> ModuleResult {
        let trades = bundle.market.as_ref().and_then(|m| m.trades.as_ref());
        let volume = bundle.market.as_ref().and_then(|m| m.volume.as_ref());

        let mut score: f64 = 70.0;
        let mut confidence: f64 = if trades.is_some() { 0.8 } else { 0.3 };
        let mut reasons = Vec::new();
        let mut flags = Vec::new();

        if let Some(t) = trades {
            if let Some(ratio) = t.repeated_wallet_ratio {
                if ratio >= WASH_RATIO_THRESHOLD {
                    score -= 40.0;
                    reasons.push(format!(
                        "{:.0}% of trades come from repeating wallets",
                        ratio * 100.0
                    ));
                    flags.push(ModuleFlag::Structured(RiskFlag {
                        key: "wash_trading".to_string(),
                        label: "Wash trading suspected".to_string(),
                        severity: Severity::Critical,
                        confidence: ratio.clamp(0.0, 1.0),
                        status: FlagStatus::Unverified,
                        evidence: format!("repeated wallet ratio {:.2}", ratio),
                        verify_hint: Some("inspect trader wallet overlap on a block explorer".to_string()),
                    }));
                }
            }
            if let Some(ratio) = t.circular_ratio {
                if ratio >= CIRCULAR_RATIO_THRESHOLD {
                    score -= 30.0;
                    reasons.push(format!(
                        "{:.0}% of volume moves in circular loops",
                        ratio * 100.0
                    ));
                    flags.push(ModuleFlag::Structured(RiskFlag {
                        key: "circular_trading".to_string(),
                        label: "Circular trading pattern".to_string(),
                        severity: Severity::Critical,
                        confidence: ratio.clamp(0.0, 1.0),
                        status: FlagStatus::Unverified,
                        evidence: format!("circular volume ratio {:.2}", ratio),
                        verify_hint: Some("trace buy/sell loops between the top wallets".to_string()),
                    }));
                }
            }
            if let Some(ratio) = t.bot_like_ratio {
                if ratio >= BOT_RATIO_THRESHOLD {
                    score -= 20.0;
                    reasons.push(format!("{:.0}% of trades show bot-like timing", ratio * 100.0));
                    flags.push(ModuleFlag::Legacy("bot_pattern".to_string()));
                }
            }
            if reasons.is_empty() {
                reasons.push("Trading pattern looks organic".to_string());
            }
        } else {
            reasons.push("No trade statistics; wash detection degraded".to_string());
        }

        // High turnover spread over almost no traders is its own tell.
        if let Some(vol) = volume {
            if let (Some(v24), Some(traders)) = (vol.vol_24h_usd, vol.unique_traders_24h) {
                if v24 >= 50_000.0 && traders < 15 {
                    score -= 15.0;
                    confidence = (confidence + 0.1).min(1.0);
                    reasons.push(format!(
                        "${:.0} daily volume from only {} traders",
                        v24, traders
                    ));
                }
            }
        }

        let mut result = ModuleResult::new(score, confidence);
        result.reasons = reasons;
        result.flags = flags;
        result
    }
}
