//! Launch-integrity scoring subsystem.
//!
//! Scores freshly observed token-creation events using only the event's own
//! payload, batch-level creator-frequency statistics, and optionally
//! pre-fetched on-chain mint state. The scorer itself is a pure function;
//! network concerns live in [`onchain`].

pub mod onchain;
pub mod scorer;
pub mod types;

pub use onchain::MintAccountFetcher;
pub use scorer::{build_creator_frequency, recent_creators, IntegrityScorer};
pub use types::{CreatorFrequencyMap, IntegrityConfig, LaunchVerdict, RiskPoints, ScoredToken};
