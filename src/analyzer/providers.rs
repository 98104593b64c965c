//! Signal providers and bundle assembly.
//!
//! Two independent providers feed the analyzer: the primary on-chain provider
//! (Solana RPC) and a secondary HTTP market-data provider. Both are fetched
//! concurrently and each failure degrades to `None` in the bundle rather than
//! failing the analysis.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument, warn};

use crate::analyzer::types::{
    ChainProviderData, HolderDistribution, LpLockInfo, MarketProviderData, PriceStats, SignalBundle,
    TokenInfo, TradeStats, VolumeStats,
};
use crate::integrity::onchain::parse_mint_account;

/// Primary on-chain signal source.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<ChainProviderData>;
}

/// Secondary market-data signal source.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<MarketProviderData>;
}

/// Provider endpoints and timeouts.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub rpc_url: String,
    pub market_base_url: String,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            market_base_url: "https://data.fluxbeam.xyz/v1".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// On-chain provider backed by a Solana RPC node.
pub struct RpcChainProvider {
    client: Arc<RpcClient>,
}

impl RpcChainProvider {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            client: Arc::new(RpcClient::new(rpc_url.to_string())),
        }
    }

    pub fn with_client(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    async fn fetch_holders(&self, mint: &Pubkey) -> Result<HolderDistribution> {
        let supply = self
            .client
            .get_token_supply(mint)
            .await
            .context("token supply lookup failed")?;
        let largest = self
            .client
            .get_token_largest_accounts(mint)
            .await
            .context("largest accounts lookup failed")?;

        let total = supply.ui_amount.unwrap_or(0.0);
        let mut top10 = 0.0;
        let mut top_holder = 0.0;
        for (i, account) in largest.iter().take(10).enumerate() {
            let amount = account.amount.ui_amount.unwrap_or(0.0);
            if i == 0 {
                top_holder = amount;
            }
            top10 += amount;
        }

        let pct = |amount: f64| {
            if total > 0.0 {
                Some(amount / total * 100.0)
            } else {
                None
            }
        };
        Ok(HolderDistribution {
            // The RPC only exposes the largest accounts, not a full count.
            total_holders: None,
            top10_pct: pct(top10),
            top_holder_pct: pct(top_holder),
            creator_pct: None,
        })
    }
}

#[async_trait]
impl ChainProvider for RpcChainProvider {
    #[instrument(skip(self), fields(address = %address))]
    async fn fetch(&self, address: &str) -> Result<ChainProviderData> {
        let mint = Pubkey::from_str(address).context("invalid mint address")?;
        let account = self
            .client
            .get_account(&mint)
            .await
            .context("mint account lookup failed")?;
        let parsed = parse_mint_account(&account.data)?;

        let token_info = Some(TokenInfo {
            name: None,
            symbol: None,
            decimals: Some(parsed.decimals),
            supply: None,
        });
        let holders = match self.fetch_holders(&mint).await {
            Ok(h) => Some(h),
            Err(error) => {
                debug!("holder lookup failed for {}: {:#}", address, error);
                None
            }
        };

        Ok(ChainProviderData {
            success: true,
            token_info,
            holders,
        })
    }
}

/// Market-data provider over plain HTTP+JSON.
pub struct HttpMarketProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of the market endpoint's token response.
#[derive(Debug, Deserialize)]
struct MarketTokenResponse {
    lp_lock: Option<LpLockInfo>,
    volume: Option<VolumeStats>,
    trades: Option<TradeStats>,
    price: Option<PriceStats>,
}

impl HttpMarketProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.market_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketProvider for HttpMarketProvider {
    #[instrument(skip(self), fields(address = %address))]
    async fn fetch(&self, address: &str) -> Result<MarketProviderData> {
        let url = format!("{}/tokens/{}", self.base_url, address);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("market request failed")?
            .error_for_status()
            .context("market request returned an error status")?;
        let body: MarketTokenResponse = response
            .json()
            .await
            .context("market response was not valid JSON")?;
        Ok(MarketProviderData {
            success: true,
            lp_lock: body.lp_lock,
            volume: body.volume,
            trades: body.trades,
            price: body.price,
        })
    }
}

/// Assembles one [`SignalBundle`] per token from both providers.
pub struct BundleAssembler {
    chain: Arc<dyn ChainProvider>,
    market: Arc<dyn MarketProvider>,
}

impl BundleAssembler {
    pub fn new(chain: Arc<dyn ChainProvider>, market: Arc<dyn MarketProvider>) -> Self {
        Self { chain, market }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(RpcChainProvider::new(&config.rpc_url)),
            Arc::new(HttpMarketProvider::new(config)?),
        ))
    }

    /// Fetch both providers concurrently. A provider failure leaves its slot
    /// `None`; the analyzer degrades confidence instead of erroring out.
    #[instrument(skip(self), fields(address = %address))]
    pub async fn assemble(
        &self,
        address: &str,
        platform: Option<String>,
        created_at: Option<i64>,
    ) -> SignalBundle {
        let (chain, market) =
            tokio::join!(self.chain.fetch(address), self.market.fetch(address));

        let chain = match chain {
            Ok(data) => Some(data),
            Err(error) => {
                warn!("chain provider failed for {}: {:#}", address, error);
                None
            }
        };
        let market = match market {
            Ok(data) => Some(data),
            Err(error) => {
                warn!("market provider failed for {}: {:#}", address, error);
                None
            }
        };

        SignalBundle {
            address: address.to_string(),
            platform,
            created_at,
            chain,
            market,
        }
    }
}
