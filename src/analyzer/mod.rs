//! Multi-module token analyzer.
//!
//! Six independent heuristic modules score a token from a multi-provider
//! [`SignalBundle`]; the aggregator combines them into a weighted score, a
//! deduplicated risk-flag list, and one of four action verdicts with 3 to 5
//! human-readable reasons.

pub mod aggregator;
pub mod flag_info;
pub mod modules;
pub mod providers;
pub mod service;
pub mod types;

pub use aggregator::TokenAnalyzer;
pub use providers::{BundleAssembler, ChainProvider, MarketProvider, ProviderConfig};
pub use service::AnalysisRunner;
pub use types::{
    AnalysisResult, AnalyzerConfig, ConfidenceLevel, DataQuality, SignalBundle, Verdict,
};
