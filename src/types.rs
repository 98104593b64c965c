//! Core input records shared by the scoring subsystems.

use serde::{Deserialize, Serialize};

/// A token-creation event observed on the tracked launch platform.
///
/// Built by the ingestion layer from platform wire data. Every field that
/// originates on the wire is optional: the integrity scorer's whole purpose is
/// to characterize incomplete or malformed records, not to reject them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchEvent {
    /// The mint address of the token, if it could be extracted
    pub mint: Option<String>,
    /// Token name from the create instruction
    pub name: Option<String>,
    /// Token symbol from the create instruction
    pub symbol: Option<String>,
    /// Metadata URI from the create instruction
    pub uri: Option<String>,
    /// Creator identity, hex encoded (64 chars for a 32-byte key)
    pub creator_hex: Option<String>,
    /// Transaction signature the event was extracted from
    pub signature: Option<String>,
    /// Slot the transaction landed in
    pub slot: u64,
    /// Unix timestamp (seconds) of the launch
    pub timestamp: Option<i64>,
    /// Whether the platform's relaxed-validation ("mayhem") mode was set
    pub is_mayhem: bool,
}

/// Pre-fetched on-chain state of a mint account.
///
/// Produced by [`crate::integrity::onchain::MintAccountFetcher`] and passed
/// into the scorer; the scorer itself never touches the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainMint {
    /// Whether the mint account exists on-chain at all
    pub exists: bool,
    /// Mint authority, if still present (supply remains inflatable)
    pub mint_authority: Option<String>,
    /// Freeze authority, if still present
    pub freeze_authority: Option<String>,
    /// Token decimals
    pub decimals: u8,
    /// SPL initialization flag
    pub is_initialized: bool,
}

impl OnChainMint {
    /// A confirmed negative: the account was looked up and is not there.
    pub fn not_found() -> Self {
        Self {
            exists: false,
            mint_authority: None,
            freeze_authority: None,
            decimals: 0,
            is_initialized: false,
        }
    }
}
