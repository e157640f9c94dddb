//! Persona identity and the persona capability trait.
//!
//! The persona set is **closed**: every identifier outside
//! `{confidant, mirror, roaster}` must be rejected at the validation
//! boundary and replaced with the default before it can reach dispatch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::message::Message;

/// One of the fixed persona response styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    /// Grounded, encouraging; validates feelings then proposes one step.
    Confidant,
    /// Reciprocity-first; mirrors tone and invites the user's reply.
    Mirror,
    /// Playful sarcasm; never punches down, drops the act on request.
    Roaster,
}

impl PersonaId {
    /// Every persona, in registry iteration order.
    pub const ALL: [PersonaId; 3] = [PersonaId::Confidant, PersonaId::Mirror, PersonaId::Roaster];

    /// The fallback persona used whenever classification or synthesis is
    /// uncertain. Ambiguous mood biases toward the reciprocity-seeking
    /// persona rather than risking a mismatched tone.
    pub const DEFAULT: PersonaId = PersonaId::Mirror;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confidant => "confidant",
            Self::Mirror => "mirror",
            Self::Roaster => "roaster",
        }
    }

    /// Parse a persona identifier, trimming whitespace and ignoring case.
    /// Returns `None` for anything outside the closed set.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|id| raw.eq_ignore_ascii_case(id.as_str()))
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate reply produced by one persona.
///
/// The text may be empty (the collaborator yielded nothing) but the
/// persona/text pairing is always well-formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaDraft {
    pub persona: PersonaId,
    pub text: String,
}

/// The persona capability: turn a conversation into a styled reply.
///
/// Implementations wrap a fixed behavioral instruction and forward the
/// conversation to the generation collaborator. They never mutate the
/// input, never retry, and never fall back — failure handling belongs to
/// the orchestrators.
#[async_trait]
pub trait Persona: Send + Sync {
    /// Which member of the closed set this is.
    fn id(&self) -> PersonaId;

    /// Generate a reply in this persona's style.
    ///
    /// `note` is an optional out-of-band instruction appended as one extra
    /// assistant turn before generation (timing and persona cues that must
    /// stay out of the visible conversation). An empty `Ok` string means
    /// the collaborator yielded nothing — that is not a failure here.
    async fn respond(
        &self,
        messages: &[Message],
        note: Option<&str>,
    ) -> std::result::Result<String, GeneratorError>;
}
