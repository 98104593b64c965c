//! Capped, cached, rate-bounded pre-fetch of on-chain mint state.
//!
//! The scorer never talks to the network; this fetcher resolves mint/freeze
//! authorities for a bounded slice of the newest mints per scoring pass and
//! hands the results over as plain data. Lookups are cached by mint with a
//! short TTL so overlapping passes reuse prior answers, and failures simply
//! leave the mint absent from the result map ("unavailable").

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use moka::future::Cache;
use nonempty::NonEmpty;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, instrument, warn};

use crate::integrity::types::IntegrityConfig;
use crate::types::OnChainMint;

/// SPL mint account layout is exactly 82 bytes.
const MINT_ACCOUNT_LEN: usize = 82;

/// Pre-fetcher for mint account state.
pub struct MintAccountFetcher {
    rpc_clients: NonEmpty<Arc<RpcClient>>,
    cache: Cache<String, OnChainMint>,
    limiter: DefaultDirectRateLimiter,
    config: IntegrityConfig,
}

impl MintAccountFetcher {
    /// Create a fetcher over one or more RPC endpoints.
    pub fn new(rpc_endpoints: Vec<String>, config: IntegrityConfig) -> Result<Self> {
        let endpoints = NonEmpty::from_vec(rpc_endpoints)
            .ok_or_else(|| anyhow!("at least one RPC endpoint is required"))?;
        let rpc_clients = endpoints.map(|endpoint| {
            Arc::new(RpcClient::new_with_timeout(
                endpoint,
                Duration::from_secs(config.rpc_timeout_seconds),
            ))
        });

        let cache = Cache::builder()
            .max_capacity(config.onchain_cache_max_entries)
            .time_to_live(Duration::from_secs(config.onchain_cache_ttl_seconds))
            .build();

        let quota = Quota::per_second(
            NonZeroU32::new(config.onchain_requests_per_second)
                .unwrap_or(NonZeroU32::new(1).expect("1 is non-zero")),
        );
        let limiter = RateLimiter::direct(quota);

        Ok(Self {
            rpc_clients,
            cache,
            limiter,
            config,
        })
    }

    /// Resolve on-chain state for a batch of mints, newest first.
    ///
    /// At most `onchain_lookup_cap` of the newest mints are looked up per
    /// pass; mints beyond the cap, with malformed addresses, or whose lookup
    /// failed are simply absent from the result.
    #[instrument(skip(self, mints), fields(requested = mints.len()))]
    pub async fn fetch_batch(&self, mints: &[String]) -> HashMap<String, OnChainMint> {
        let mut results = HashMap::new();

        for mint in mints.iter().take(self.config.onchain_lookup_cap) {
            let pubkey = match Pubkey::from_str(mint) {
                Ok(pk) => pk,
                Err(_) => continue, // scorer penalizes the format separately
            };

            if let Some(cached) = self.cache.get(mint).await {
                results.insert(mint.clone(), cached);
                continue;
            }

            self.limiter.until_ready().await;
            match self.fetch_one_with_retries(&pubkey).await {
                Ok(info) => {
                    self.cache.insert(mint.clone(), info.clone()).await;
                    results.insert(mint.clone(), info);
                }
                Err(e) => {
                    warn!("mint lookup failed for {}: {:#}", mint, e);
                }
            }
        }

        debug!("resolved {}/{} mints", results.len(), mints.len());
        results
    }

    async fn fetch_one_with_retries(&self, mint: &Pubkey) -> Result<OnChainMint> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.config.rpc_retry_attempts);

        let attempt = AtomicUsize::new(0);
        Retry::spawn(retry_strategy, || {
            let rpc = self.client_for_attempt(attempt.fetch_add(1, Ordering::Relaxed));
            self.fetch_one(rpc, mint)
        })
        .await
    }

    /// Round-robin over the configured endpoints, so a retry after a failing
    /// node lands on the next one.
    fn client_for_attempt(&self, attempt: usize) -> &Arc<RpcClient> {
        self.rpc_clients
            .get(attempt % self.rpc_clients.len())
            .unwrap_or_else(|| self.rpc_clients.first())
    }

    async fn fetch_one(&self, rpc: &RpcClient, mint: &Pubkey) -> Result<OnChainMint> {
        let response = rpc
            .get_account_with_commitment(mint, CommitmentConfig::confirmed())
            .await
            .context("mint account lookup failed")?;

        match response.value {
            None => Ok(OnChainMint::not_found()),
            Some(account) => parse_mint_account(&account.data),
        }
    }
}

/// Parse the fixed SPL mint layout.
///
/// Offsets: COption<Pubkey> mint authority at 0..36 (u32 tag + key), supply
/// at 36..44, decimals at 44, is_initialized at 45, COption<Pubkey> freeze
/// authority at 46..82.
pub fn parse_mint_account(data: &[u8]) -> Result<OnChainMint> {
    if data.len() < MINT_ACCOUNT_LEN {
        return Err(anyhow!("mint account data too short: {} bytes", data.len()));
    }

    let mint_authority = parse_coption_pubkey(&data[0..36])?;
    let decimals = data[44];
    let is_initialized = data[45] != 0;
    let freeze_authority = parse_coption_pubkey(&data[46..82])?;

    Ok(OnChainMint {
        exists: true,
        mint_authority,
        freeze_authority,
        decimals,
        is_initialized,
    })
}

fn parse_coption_pubkey(bytes: &[u8]) -> Result<Option<String>> {
    let tag = u32::from_le_bytes(bytes[0..4].try_into().context("bad COption tag")?);
    match tag {
        0 => Ok(None),
        1 => {
            let key: [u8; 32] = bytes[4..36].try_into().context("bad COption pubkey")?;
            Ok(Some(Pubkey::new_from_array(key).to_string()))
        }
        other => Err(anyhow!("unexpected COption tag {}", other)),
    }
}
