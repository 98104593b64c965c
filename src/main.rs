//! Demo entry point for the mintsift scoring pipeline.
//!
//! Decodes a hand-built webhook transaction, scores the launch batch, stores
//! it in the bounded feed, and runs one analyzer pass over a synthetic
//! signal bundle.

use std::collections::HashMap;

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use mintsift::analyzer::types::{
    ChainProviderData, HolderDistribution, LpLockInfo, LpLockStatus, MarketProviderData,
    SignalBundle, VolumeStats,
};
use mintsift::analyzer::TokenAnalyzer;
use mintsift::feed::{FeedConfig, FeedService, SqliteLaunchStore};
use mintsift::ingest::{extract_creation, WebhookInstruction, WebhookTransaction, CREATE_DISCRIMINATOR, PUMP_PROGRAM_ID};
use mintsift::integrity::{IntegrityConfig, IntegrityScorer};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting mintsift scoring demo");

    // 1. Decode a webhook transaction into a launch event.
    let tx = demo_webhook_transaction();
    let event = extract_creation(&tx)?.expect("demo payload carries a create instruction");
    info!(
        "Decoded launch: mint={:?} name={:?} symbol={:?}",
        event.mint, event.name, event.symbol
    );

    // 2. Score the batch and persist it in the bounded feed.
    let storage = SqliteLaunchStore::new("sqlite:./launches.db?mode=rwc").await?;
    let feed = FeedService::new(
        IntegrityScorer::new(IntegrityConfig::default()),
        storage,
        FeedConfig::default(),
    );
    let inserted = feed.ingest_batch(&[event], &HashMap::new()).await?;
    info!("Stored {} new launches", inserted);

    let response = feed.scored_feed("demo-client").await?;
    for item in &response.items {
        info!(
            "Feed item: mint={:?} score={} verdict={}",
            item.mint,
            item.score,
            item.verdict.as_str()
        );
    }

    // 3. Run the analyzer over a synthetic signal bundle.
    let analyzer = TokenAnalyzer::default();
    let bundle = demo_signal_bundle();
    let analysis = analyzer.analyze(&bundle.address, &bundle);
    info!(
        "Analysis: verdict={} confidence={:?} flags={}",
        analysis.verdict.as_str(),
        analysis.confidence,
        analysis.risk_flags.len()
    );
    for reason in &analysis.reasons {
        info!("  - {}", reason);
    }

    info!("Demo completed. Database file 'launches.db' holds the feed window.");
    Ok(())
}

/// A webhook transaction carrying one valid create instruction.
fn demo_webhook_transaction() -> WebhookTransaction {
    let mut data = CREATE_DISCRIMINATOR.to_vec();
    for field in ["Demo Token", "DEMO", "https://example.com/demo.json"] {
        data.extend_from_slice(&(field.len() as u32).to_le_bytes());
        data.extend_from_slice(field.as_bytes());
    }
    data.extend_from_slice(&[0x42; 32]);
    data.push(0);

    WebhookTransaction {
        signature: Some("DemoSignature111".to_string()),
        slot: 12345,
        block_time: Some(Utc::now().timestamp()),
        instructions: vec![WebhookInstruction {
            program_id: PUMP_PROGRAM_ID.to_string(),
            data: BASE64.encode(data),
            accounts: vec!["DemoMint111111111111111111111111".to_string()],
        }],
    }
}

/// A healthy-looking signal bundle for the analyzer pass.
fn demo_signal_bundle() -> SignalBundle {
    let now = Utc::now().timestamp();
    SignalBundle {
        address: "DemoMint111111111111111111111111".to_string(),
        platform: Some("pump.fun".to_string()),
        created_at: Some(now - 24 * 3600),
        chain: Some(ChainProviderData {
            success: true,
            token_info: None,
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
            trades: None,
            price: None,
        }),
    }
}
