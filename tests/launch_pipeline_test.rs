//! Webhook payload to scored feed, end to end.

use std::collections::HashMap;
use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use mintsift::feed::{FeedConfig, FeedService, SqliteLaunchStore};
use mintsift::ingest::{
    extract_creation, WebhookInstruction, WebhookTransaction, CREATE_DISCRIMINATOR,
    PUMP_PROGRAM_ID,
};
use mintsift::integrity::{CreatorFrequencyMap, IntegrityConfig, IntegrityScorer, LaunchVerdict};
use mintsift::types::{LaunchEvent, OnChainMint};
use solana_sdk::pubkey::Pubkey;

fn create_instruction_data(name: &str, symbol: &str, uri: &str) -> Vec<u8> {
    let mut data = CREATE_DISCRIMINATOR.to_vec();
    for field in [name, symbol, uri] {
        data.extend_from_slice(&(field.len() as u32).to_le_bytes());
        data.extend_from_slice(field.as_bytes());
    }
    data.extend_from_slice(&[0xab; 32]);
    data.push(0);
    data
}

fn webhook_tx(mint: &str, signature: &str) -> WebhookTransaction {
    WebhookTransaction {
        signature: Some(signature.to_string()),
        slot: 100,
        block_time: Some(Utc::now().timestamp()),
        instructions: vec![WebhookInstruction {
            program_id: PUMP_PROGRAM_ID.to_string(),
            data: BASE64.encode(create_instruction_data(
                "Pipeline Token",
                "PIPE",
                "https://arweave.net/meta.json",
            )),
            accounts: vec![mint.to_string()],
        }],
    }
}

#[tokio::test]
async fn test_webhook_to_feed() {
    let mint = Pubkey::new_unique().to_string();
    let event = extract_creation(&webhook_tx(&mint, "sig-pipeline"))
        .expect("decode")
        .expect("creation present");
    assert_eq!(event.mint.as_deref(), Some(mint.as_str()));

    let storage = SqliteLaunchStore::with_cap("sqlite::memory:", 500)
        .await
        .expect("store");
    let feed = FeedService::new(
        IntegrityScorer::new(IntegrityConfig::default()),
        storage,
        FeedConfig::default(),
    );

    let onchain: HashMap<String, OnChainMint> = [(
        mint.clone(),
        OnChainMint {
            exists: true,
            mint_authority: None,
            freeze_authority: None,
            decimals: 6,
            is_initialized: true,
        },
    )]
    .into_iter()
    .collect();

    let inserted = feed.ingest_batch(&[event], &onchain).await.expect("ingest");
    assert_eq!(inserted, 1);

    let response = feed.scored_feed("pipeline-client").await.expect("feed");
    assert!(response.ok);
    assert_eq!(response.count, 1);
    let item = &response.items[0];
    assert_eq!(item.mint.as_deref(), Some(mint.as_str()));
    assert_eq!(item.score, 0);
    assert_eq!(item.verdict, LaunchVerdict::CleanIsh);
    assert!(!item.reasons.is_empty());
}

#[test]
fn test_missing_mint_event_scores_terminal() {
    let scorer = IntegrityScorer::new(IntegrityConfig::default());
    let event = LaunchEvent {
        mint: None,
        name: Some("X".to_string()),
        symbol: Some("X".to_string()),
        uri: Some("https://a.com/m".to_string()),
        creator_hex: Some("aa".repeat(32)),
        signature: Some("sig1".to_string()),
        slot: 1,
        timestamp: Some(Utc::now().timestamp()),
        is_mayhem: false,
    };
    let scored = scorer.score_event(
        &event,
        &CreatorFrequencyMap::new(),
        &HashSet::new(),
        None,
    );
    assert_eq!(scored.score, 100);
    assert_eq!(scored.verdict, LaunchVerdict::Unknown);
    assert_eq!(scored.reasons.len(), 1);
}

#[test]
fn test_pristine_event_scores_at_floor() {
    let scorer = IntegrityScorer::new(IntegrityConfig::default());
    let event = LaunchEvent {
        mint: Some(Pubkey::new_unique().to_string()),
        name: Some("Fresh Token".to_string()),
        symbol: Some("FRSH".to_string()),
        uri: Some("https://arweave.net/meta.json".to_string()),
        creator_hex: Some("cc".repeat(32)),
        signature: Some("sig-fresh".to_string()),
        slot: 1,
        timestamp: Some(Utc::now().timestamp()),
        is_mayhem: false,
    };
    let onchain = OnChainMint {
        exists: true,
        mint_authority: None,
        freeze_authority: None,
        decimals: 6,
        is_initialized: true,
    };
    let scored = scorer.score_event(
        &event,
        &CreatorFrequencyMap::new(),
        &HashSet::new(),
        Some(&onchain),
    );
    assert_eq!(scored.score, 0);
    assert_eq!(scored.verdict, LaunchVerdict::CleanIsh);
}

#[tokio::test]
async fn test_feed_window_stays_bounded() {
    let storage = SqliteLaunchStore::with_cap("sqlite::memory:", 5)
        .await
        .expect("store");
    let feed = FeedService::new(
        IntegrityScorer::new(IntegrityConfig::default()),
        storage,
        FeedConfig {
            response_ttl: std::time::Duration::from_millis(0),
            ..FeedConfig::default()
        },
    );

    for i in 0..8 {
        let mint = Pubkey::new_unique().to_string();
        let event = extract_creation(&webhook_tx(&mint, &format!("sig-{}", i)))
            .unwrap()
            .unwrap();
        feed.ingest_batch(&[event], &HashMap::new()).await.unwrap();
    }

    let response = feed.scored_feed("bounded-client").await.unwrap();
    assert_eq!(response.count, 5);
}
