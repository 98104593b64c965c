//! End-to-end verdict behavior through the real module set.

use chrono::Utc;
use mintsift::analyzer::types::{
    ChainProviderData, ConfidenceLevel, HolderDistribution, LpLockInfo, LpLockStatus,
    MarketProviderData, PriceStats, SignalBundle, TokenInfo, TradeStats, Verdict, VolumeStats,
};
use mintsift::analyzer::TokenAnalyzer;

/// A bundle with every signal healthy: locked LP, broad holders, organic
/// volume, flat price, two days old.
fn healthy_bundle(now: i64) -> SignalBundle {
    SignalBundle {
        address: "HealthyMint111".to_string(),
        platform: Some("pump.fun".to_string()),
        created_at: Some(now - 48 * 3600),
        chain: Some(ChainProviderData {
            success: true,
            token_info: Some(TokenInfo {
                name: Some("Healthy".to_string()),
                symbol: Some("HLT".to_string()),
                decimals: Some(6),
                supply: Some(1_000_000_000),
            }),
            holders: Some(HolderDistribution {
                total_holders: Some(650),
                top10_pct: Some(28.0),
                top_holder_pct: Some(6.0),
                creator_pct: Some(3.0),
            }),
        }),
        market: Some(MarketProviderData {
            success: true,
            lp_lock: Some(LpLockInfo {
                status: LpLockStatus::Locked,
                locked_pct: Some(100.0),
                checked_at: Some(now - 600),
            }),
            volume: Some(VolumeStats {
                vol_5m_usd: Some(800.0),
                vol_1h_usd: Some(12_000.0),
                vol_24h_usd: Some(90_000.0),
                buy_count_24h: Some(420),
                sell_count_24h: Some(310),
                unique_traders_24h: Some(150),
            }),
            trades: Some(TradeStats {
                repeated_wallet_ratio: Some(0.1),
                circular_ratio: Some(0.05),
                bot_like_ratio: Some(0.1),
            }),
            price: Some(PriceStats {
                change_5m_pct: Some(1.0),
                change_1h_pct: Some(4.0),
                change_24h_pct: Some(12.0),
                from_ath_pct: Some(-20.0),
            }),
        }),
    }
}

#[test]
fn test_healthy_token_enters_with_high_confidence() {
    let now = Utc::now().timestamp();
    let analyzer = TokenAnalyzer::default();
    let result = analyzer.analyze_at("HealthyMint111", &healthy_bundle(now), now);
    assert_eq!(result.verdict, Verdict::Enter);
    assert_eq!(result.confidence, ConfidenceLevel::High);
    assert!(result.risk_flags.is_empty());
}

#[test]
fn test_unlocked_lp_overrides_otherwise_healthy_signals() {
    // Every ENTER condition except the liquidity lock; the exit path wins.
    let now = Utc::now().timestamp();
    let mut bundle = healthy_bundle(now);
    bundle.market.as_mut().unwrap().lp_lock = Some(LpLockInfo {
        status: LpLockStatus::Unlocked,
        locked_pct: Some(0.0),
        checked_at: Some(now - 600),
    });
    let result = TokenAnalyzer::default().analyze_at("HealthyMint111", &bundle, now);
    assert_eq!(result.verdict, Verdict::Exit);
    assert!(result
        .risk_flags
        .iter()
        .any(|f| f.key == "lp_unlocked"));
}

#[test]
fn test_at_most_one_liquidity_flag_survives() {
    let now = Utc::now().timestamp();
    let mut bundle = healthy_bundle(now);
    bundle.market.as_mut().unwrap().lp_lock = Some(LpLockInfo {
        status: LpLockStatus::Unlocked,
        locked_pct: None,
        checked_at: None,
    });
    let result = TokenAnalyzer::default().analyze_at("HealthyMint111", &bundle, now);
    let lp_flags: Vec<_> = result
        .risk_flags
        .iter()
        .filter(|f| f.key.starts_with("lp_"))
        .collect();
    assert_eq!(lp_flags.len(), 1);
    assert_eq!(lp_flags[0].key, "lp_unlocked");
}

#[test]
fn test_hour_old_token_never_high_confidence() {
    let now = Utc::now().timestamp();
    let mut bundle = healthy_bundle(now);
    bundle.created_at = Some(now - 3600);
    let result = TokenAnalyzer::default().analyze_at("HealthyMint111", &bundle, now);
    assert_ne!(result.confidence, ConfidenceLevel::High);
}

#[test]
fn test_reason_count_bounds_across_bundle_shapes() {
    let now = Utc::now().timestamp();
    let analyzer = TokenAnalyzer::default();

    let bundles = [
        healthy_bundle(now),
        SignalBundle {
            address: "EmptyMint111".to_string(),
            ..SignalBundle::default()
        },
        SignalBundle {
            address: "ChainOnly111".to_string(),
            chain: healthy_bundle(now).chain,
            ..SignalBundle::default()
        },
    ];
    for bundle in &bundles {
        let result = analyzer.analyze_at(&bundle.address, bundle, now);
        assert!(
            (3..=5).contains(&result.reasons.len()),
            "{} reasons for {}",
            result.reasons.len(),
            bundle.address
        );
    }
}

#[test]
fn test_empty_bundle_is_never_enter() {
    let now = Utc::now().timestamp();
    let bundle = SignalBundle {
        address: "EmptyMint111".to_string(),
        ..SignalBundle::default()
    };
    let result = TokenAnalyzer::default().analyze_at("EmptyMint111", &bundle, now);
    assert_ne!(result.verdict, Verdict::Enter);
    assert_eq!(
        result.data_quality,
        mintsift::analyzer::types::DataQuality::Partial
    );
}

#[test]
fn test_wash_traded_volume_is_not_entered() {
    let now = Utc::now().timestamp();
    let mut bundle = healthy_bundle(now);
    bundle.market.as_mut().unwrap().trades = Some(TradeStats {
        repeated_wallet_ratio: Some(0.8),
        circular_ratio: Some(0.5),
        bot_like_ratio: Some(0.7),
    });
    let result = TokenAnalyzer::default().analyze_at("HealthyMint111", &bundle, now);
    assert_ne!(result.verdict, Verdict::Enter);
    assert!(result
        .risk_flags
        .iter()
        .any(|f| f.key == "wash_trading" || f.key == "circular_trading"));
}
