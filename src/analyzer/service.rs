//! Analysis orchestration with latest-wins request semantics.
//!
//! A client (UI pane, bot session) may fire a new analysis request while a
//! previous one is still fetching. Per client only the newest request may
//! deliver a result; superseded requests complete their fetch but their
//! results are discarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::analyzer::aggregator::TokenAnalyzer;
use crate::analyzer::providers::BundleAssembler;
use crate::analyzer::types::AnalysisResult;

/// Ticket identifying one analysis request within a client's stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Generation(u64);

/// Runs analyses, dropping results that were superseded by a newer request
/// from the same client.
pub struct AnalysisRunner {
    analyzer: Arc<TokenAnalyzer>,
    assembler: Arc<BundleAssembler>,
    next_generation: AtomicU64,
    latest: Mutex<HashMap<String, Generation>>,
}

impl AnalysisRunner {
    pub fn new(analyzer: Arc<TokenAnalyzer>, assembler: Arc<BundleAssembler>) -> Self {
        Self {
            analyzer,
            assembler,
            next_generation: AtomicU64::new(1),
            latest: Mutex::new(HashMap::new()),
        }
    }

    /// Analyze a token on behalf of `client_id`.
    ///
    /// Returns `None` when a newer request from the same client arrived while
    /// this one was fetching.
    #[instrument(skip(self), fields(client = %client_id, address = %address))]
    pub async fn analyze(
        &self,
        client_id: &str,
        address: &str,
        platform: Option<String>,
        created_at: Option<i64>,
    ) -> Option<AnalysisResult> {
        let my_generation = self.register(client_id);

        let bundle = self.assembler.assemble(address, platform, created_at).await;

        if !self.is_current(client_id, my_generation) {
            debug!("dropping superseded analysis for {}", address);
            return None;
        }
        let result = self.analyzer.analyze(address, &bundle);

        // A newer request may have landed during the synchronous analysis.
        if !self.is_current(client_id, my_generation) {
            debug!("dropping superseded analysis for {}", address);
            return None;
        }
        Some(result)
    }

    fn register(&self, client_id: &str) -> Generation {
        let generation = Generation(self.next_generation.fetch_add(1, Ordering::Relaxed));
        self.latest
            .lock()
            .expect("generation map poisoned")
            .insert(client_id.to_string(), generation);
        generation
    }

    fn is_current(&self, client_id: &str, generation: Generation) -> bool {
        self.latest
            .lock()
            .expect("generation map poisoned")
            .get(client_id)
            == Some(&generation)
    }
}
