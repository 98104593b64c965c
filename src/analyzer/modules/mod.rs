//! The six independent scoring strategies.
//!
//! Every module consumes the full [`SignalBundle`] and returns a
//! [`ModuleResult`], degrading its own confidence instead of failing when
//! inputs are missing. Modules never see each other's output; combination
//! happens in the aggregator.

mod dead_or_sleeping;
mod fake_move;
mod holder_psychology;
mod rug_narrative;
mod too_late;
mod worth_attention;

pub use dead_or_sleeping::DeadOrSleeping;
pub use fake_move::FakeMove;
pub use holder_psychology::HolderPsychology;
pub use rug_narrative::RugNarrative;
pub use too_late::TooLate;
pub use worth_attention::WorthAttention;

use crate::analyzer::types::{ModuleResult, SignalBundle};

/// Uniform interface of the scoring strategies.
pub trait ScoringModule: Send + Sync {
    /// Stable key, also used for weight lookup.
    fn key(&self) -> &'static str;

    /// Evaluate the bundle. `now` is unix seconds; passing it in keeps the
    /// modules deterministic under test.
    fn evaluate(&self, bundle: &SignalBundle, now: i64) -> ModuleResult;
}

/// The default module set, in their conventional order.
pub fn default_modules() -> Vec<Box<dyn ScoringModule>> {
    vec![
        Box::new(WorthAttention),
        Box::new(FakeMove),
        Box::new(TooLate),
        Box::new(DeadOrSleeping),
        Box::new(HolderPsychology),
        Box::new(RugNarrative),
    ]
}
