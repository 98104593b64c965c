//! Static presentation metadata for risk flag keys.
//!
//! Keyed lookup used when a module emitted only a bare flag identifier and
//! the aggregator has to fill in the human-facing parts.

/// Display title and verification pointer for one flag key.
#[derive(Debug, Clone, Copy)]
pub struct FlagInfo {
    pub key: &'static str,
    pub title: &'static str,
    /// What the flag means in one sentence.
    pub describe: &'static str,
    /// Where a human can independently confirm it.
    pub verify: &'static str,
}

static FLAG_TABLE: &[FlagInfo] = &[
    FlagInfo {
        key: "lp_unlocked",
        title: "Liquidity unlocked",
        describe: "The trading pool's liquidity is not locked and can be pulled at any moment",
        verify: "check the LP token holders for a locker contract",
    },
    FlagInfo {
        key: "lp_mixed",
        title: "Mixed liquidity lock",
        describe: "Some pools are locked and some are not",
        verify: "compare lock coverage across every pool",
    },
    FlagInfo {
        key: "lp_stale",
        title: "Stale liquidity lock data",
        describe: "The last lock observation is too old to trust",
        verify: "re-check the lock status directly on-chain",
    },
    FlagInfo {
        key: "lp_unverified",
        title: "Liquidity lock unverified",
        describe: "No provider could confirm the lock either way",
        verify: "inspect the pool contract manually",
    },
    FlagInfo {
        key: "lp_unknown",
        title: "Liquidity lock unknown",
        describe: "No liquidity lock data was available at all",
        verify: "look the pool up on a DEX screener",
    },
    FlagInfo {
        key: "honeypot_sell_block",
        title: "Possible honeypot",
        describe: "Buys go through but nobody has managed to sell",
        verify: "attempt a minimal test sell",
    },
    FlagInfo {
        key: "wash_trading",
        title: "Wash trading",
        describe: "A large share of volume comes from the same wallets recycling trades",
        verify: "trace the top trading wallets' histories",
    },
    FlagInfo {
        key: "circular_trading",
        title: "Circular trading",
        describe: "Volume moves in closed buy/sell loops between related wallets",
        verify: "follow the funds between the looping wallets",
    },
    FlagInfo {
        key: "bot_pattern",
        title: "Bot-driven trading",
        describe: "Trade timing shows machine-like regularity",
        verify: "sample trade timestamps for sub-second spacing",
    },
    FlagInfo {
        key: "whale_concentration",
        title: "Whale concentration",
        describe: "A handful of wallets control most of the supply",
        verify: "check the holder tab on a token explorer",
    },
    FlagInfo {
        key: "creator_dumping",
        title: "Creator holding risk",
        describe: "The creator still holds a share large enough to crash the price",
        verify: "watch the creator wallet for outgoing transfers",
    },
    FlagInfo {
        key: "mint_authority_active",
        title: "Mint authority active",
        describe: "Supply can still be inflated by the mint authority",
        verify: "read the mint account's authority field",
    },
    FlagInfo {
        key: "freeze_authority_active",
        title: "Freeze authority active",
        describe: "Token accounts can be frozen, blocking sells",
        verify: "read the mint account's freeze authority field",
    },
    FlagInfo {
        key: "rug_pattern",
        title: "Rug pattern",
        describe: "The overall setup matches known exit-scam launches",
        verify: "compare against the creator's previous launches",
    },
    FlagInfo {
        key: "dead_pool",
        title: "Dead pool",
        describe: "No meaningful trading activity for days",
        verify: "check the pool's recent trade history",
    },
    FlagInfo {
        key: "low_liquidity",
        title: "Low liquidity",
        describe: "Too little liquidity to exit a position cleanly",
        verify: "check the pool depth on a DEX screener",
    },
];

/// Look up presentation metadata for a flag key.
pub fn flag_info(key: &str) -> Option<&'static FlagInfo> {
    FLAG_TABLE.iter().find(|info| info.key == key)
}
