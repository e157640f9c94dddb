//! Orchestration strategies for Dormline.
//!
//! Two interchangeable strategies behind the `dormline_core::Orchestrator`
//! contract:
//!
//! 1. **Router** — one classification call picks exactly one persona,
//!    which then answers directly.
//! 2. **Synthesizer** — all personas draft concurrently, then one
//!    synthesis call picks or blends them into a single reply.
//!
//! Both validate the collaborator's structured output strictly and default
//! deterministically (to mirror) on anything malformed; an invalid persona
//! identifier never leaks past this crate.

pub mod router;
pub mod synthesizer;

pub use router::RouterOrchestrator;
pub use synthesizer::SynthesizerOrchestrator;

use std::sync::Arc;

use dormline_config::Strategy;
use dormline_core::generator::Generator;
use dormline_core::orchestrator::Orchestrator;

/// Build the active orchestration strategy for a deployment.
///
/// This is the system's one composition point: both strategies expose the
/// same `orchestrate` contract, so the rest of the stack never knows which
/// one is running.
pub fn build_orchestrator(strategy: Strategy, generator: Arc<dyn Generator>) -> Arc<dyn Orchestrator> {
    match strategy {
        Strategy::Router => Arc::new(RouterOrchestrator::new(generator)),
        Strategy::Synthesizer => Arc::new(SynthesizerOrchestrator::new(generator)),
    }
}
