//! Orchestrator trait and the Decision output contract.
//!
//! Both orchestration strategies (router and synthesizer) expose the same
//! `orchestrate` contract, which makes them interchangeable behind a single
//! configuration switch. Adding a strategy means adding a trait impl.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;
use crate::message::Message;
use crate::persona::PersonaId;
use crate::timing::TimingDigest;

/// Caller-provided context for one orchestration call. Timing is computed
/// by the caller from raw timestamps and passed in already derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationContext {
    #[serde(default)]
    pub timing: TimingDigest,
}

/// The sole externally visible output of orchestration.
///
/// On a successful call `text` is never empty — orchestrators fall back to
/// a persona's own direct reply before returning rather than surfacing an
/// empty message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// The persona anchoring the final reply.
    pub persona: PersonaId,

    /// Why this persona was chosen (parsed from the collaborator, or a
    /// fixed diagnostic string when classification/synthesis fell back).
    pub rationale: String,

    /// The final assistant message.
    pub text: String,

    /// Personas whose phrasing contributed to a blended reply, when the
    /// synthesizer reported them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<BTreeSet<PersonaId>>,
}

/// An orchestration strategy: decide which persona(s) to use and produce
/// one final reply for the given conversation.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// A stable name for this strategy (for logs and config).
    fn name(&self) -> &str;

    /// Run one orchestration call. All state is call-local.
    async fn orchestrate(
        &self,
        messages: &[Message],
        context: &OrchestrationContext,
    ) -> std::result::Result<Decision, OrchestratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_serialization_roundtrip() {
        let decision = Decision {
            persona: PersonaId::Confidant,
            rationale: "user venting about finals".into(),
            text: "that sounds rough, let's break it down".into(),
            contributors: Some(BTreeSet::from([PersonaId::Confidant, PersonaId::Mirror])),
        };
        let json = serde_json::to_string(&decision).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(back.persona, PersonaId::Confidant);
        assert_eq!(back.contributors.unwrap().len(), 2);
    }

    #[test]
    fn contributors_skipped_when_absent() {
        let decision = Decision {
            persona: PersonaId::Mirror,
            rationale: "r".into(),
            text: "t".into(),
            contributors: None,
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert!(!json.contains("contributors"));
    }
}
