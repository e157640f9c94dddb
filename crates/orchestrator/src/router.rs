//! Router strategy: classify the conversation, then let one persona answer.
//!
//! Two sequential phases — the respond phase depends on the classify
//! phase's result, so there is nothing to parallelize here.

use std::sync::Arc;

use async_trait::async_trait;
use dormline_core::error::OrchestratorError;
use dormline_core::generator::{GenerateRequest, Generator, OutputSchema};
use dormline_core::message::Message;
use dormline_core::orchestrator::{Decision, OrchestrationContext, Orchestrator};
use dormline_core::persona::PersonaId;
use dormline_core::timing::TimingDigest;
use dormline_personas::PersonaSet;
use serde::Deserialize;
use tracing::{info, warn};

/// Fixed rationale when classification is unusable and the default persona
/// is forced. Ambiguous mood biases toward the reciprocity-seeking persona.
pub const DEFAULT_ROUTE_RATIONALE: &str = "defaulted since uncertain mood, picked reciprocity";

/// Single-shot classify-then-respond orchestrator.
pub struct RouterOrchestrator {
    generator: Arc<dyn Generator>,
    personas: PersonaSet,
}

impl RouterOrchestrator {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            personas: PersonaSet::new(generator.clone()),
            generator,
        }
    }

    /// The classification instruction: closed persona set, ordered
    /// heuristic rules, telemetry tie-breaks, and the rendered digest.
    fn classification_instruction(timing: &TimingDigest) -> String {
        let telemetry = dormline_telemetry::summarize(timing);
        format!(
            r#"You are the router for a laid-back college-friend chatbot. Pick EXACTLY ONE persona to answer the user right now: "confidant", "mirror", or "roaster".

Available personas: "confidant", "mirror", "roaster". Use only one of these.

Work through these steps:
  1) Emotional tone and context:
     - heavy topics, stress, balance, academics, mental health: lean "confidant"
     - one-sided conversation, terse user, long delays, rudeness: lean "mirror"
     - playful, memes, banter, low-stakes social chatter: lean "roaster"
  2) Intent and topic cues:
     - planning, deadlines, tradeoffs: lean "confidant"
     - check-ins, reciprocity, "your turn" needed: lean "mirror"
     - jokes, taunts, gossip, light teasing: lean "roaster"
  3) Safety and vibe:
     - if the mood is unclear, default to "mirror"
     - if the user is toxic or rude, lean "mirror" (short and boundary-forward)
     - if the user explicitly asks for serious, no-banter support, lean "confidant"

Constraints:
- Speak only through structured output. No extra text.
- Choose personas only from the list above.
- Prefer clarity and coherence over breadth.

Conversation telemetry:
{telemetry}

Output strictly as JSON:
{{"agent": "mirror", "reasons": "user seems distant and terse; needs a check-in"}}"#
        )
    }

    fn selection_schema() -> OutputSchema {
        OutputSchema {
            name: "persona_selection".into(),
            schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "agent": { "type": "STRING" },
                    "reasons": { "type": "STRING" }
                },
                "required": ["agent"]
            }),
        }
    }

    /// Strict decode-with-defaults of the classification result.
    ///
    /// Any decode error, or an `agent` outside the closed set, forces the
    /// default persona with the fixed rationale; a partially valid decode
    /// never leaks an invalid identifier.
    fn validate_selection(raw: &str) -> (PersonaId, String) {
        let fallback = || (PersonaId::DEFAULT, DEFAULT_ROUTE_RATIONALE.to_string());

        let Ok(dto) = serde_json::from_str::<SelectionDto>(raw) else {
            warn!("router: classification output unparseable, forcing default");
            return fallback();
        };

        match dto.agent.as_deref().and_then(PersonaId::parse) {
            Some(persona) => {
                let rationale = dto
                    .reasons
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_ROUTE_RATIONALE.to_string());
                (persona, rationale)
            }
            None => {
                warn!(agent = ?dto.agent, "router: persona outside closed set, forcing default");
                fallback()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SelectionDto {
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    reasons: Option<String>,
}

#[async_trait]
impl Orchestrator for RouterOrchestrator {
    fn name(&self) -> &str {
        "router"
    }

    async fn orchestrate(
        &self,
        messages: &[Message],
        context: &OrchestrationContext,
    ) -> Result<Decision, OrchestratorError> {
        // ── Phase 1: Classify ──
        let classification = self
            .generator
            .generate(GenerateRequest {
                messages: messages.to_vec(),
                system_instruction: Self::classification_instruction(&context.timing),
                output_schema: Some(Self::selection_schema()),
            })
            .await?;

        let (persona, rationale) = Self::validate_selection(&classification.text);
        info!(persona = %persona, "router: persona selected");

        // ── Phase 2: Respond ──
        let note = dormline_telemetry::briefing(persona, &context.timing);
        let text = self
            .personas
            .get(persona)
            .respond(messages, Some(&note))
            .await?;

        // Empty text from the persona is surfaced as-is here; the router
        // has no collected drafts to fall back on.
        Ok(Decision {
            persona,
            rationale,
            text,
            contributors: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dormline_providers::ScriptedGenerator;

    fn context_with_lag(lag: f64) -> OrchestrationContext {
        OrchestrationContext {
            timing: TimingDigest {
                total_turns: Some(6),
                latest_user_lag_secs: Some(lag),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn stressed_user_routed_to_confidant() {
        let generator = Arc::new(ScriptedGenerator::with_texts(vec![
            r#"{"agent": "confidant", "reasons": "user venting about finals stress"}"#,
            "hey, deep breath. let's figure out one thing to tackle first",
        ]));
        let router = RouterOrchestrator::new(generator.clone());

        let messages = vec![Message::user("stressed about finals, can't balance everything")];
        let decision = router
            .orchestrate(&messages, &OrchestrationContext::default())
            .await
            .unwrap();

        assert_eq!(decision.persona, PersonaId::Confidant);
        assert_eq!(decision.rationale, "user venting about finals stress");
        assert!(!decision.text.is_empty());
        assert!(decision.contributors.is_none());
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn invalid_agents_force_mirror_with_fixed_rationale() {
        let bad_outputs = [
            "{}",
            "not json at all",
            r#"{"agent": "therapist", "reasons": "seems sad"}"#,
            r#"{"agent": 42}"#,
            r#"{"agent": ""}"#,
        ];

        for raw in bad_outputs {
            let (persona, rationale) = RouterOrchestrator::validate_selection(raw);
            assert_eq!(persona, PersonaId::Mirror, "output: {raw}");
            assert_eq!(rationale, DEFAULT_ROUTE_RATIONALE, "output: {raw}");
        }
    }

    #[tokio::test]
    async fn valid_agent_without_reasons_keeps_default_rationale() {
        let (persona, rationale) =
            RouterOrchestrator::validate_selection(r#"{"agent": "Roaster"}"#);
        assert_eq!(persona, PersonaId::Roaster);
        assert_eq!(rationale, DEFAULT_ROUTE_RATIONALE);
    }

    #[tokio::test]
    async fn unparseable_classification_still_gets_a_reply() {
        let generator = Arc::new(ScriptedGenerator::with_texts(vec![
            "garbage",
            "hey, it's been a minute. what's going on with you?",
        ]));
        let router = RouterOrchestrator::new(generator);

        let decision = router
            .orchestrate(
                &[Message::user("hm")],
                &OrchestrationContext::default(),
            )
            .await
            .unwrap();

        assert_eq!(decision.persona, PersonaId::Mirror);
        assert_eq!(decision.rationale, DEFAULT_ROUTE_RATIONALE);
        assert!(!decision.text.is_empty());
    }

    #[tokio::test]
    async fn lag_value_appears_verbatim_in_classification_prompt() {
        let generator = Arc::new(ScriptedGenerator::with_texts(vec![
            r#"{"agent": "mirror"}"#,
            "ok your turn, what's up with you",
        ]));
        let router = RouterOrchestrator::new(generator.clone());

        // Three terse, slow turns — the heuristic input the prompt must carry.
        let messages = vec![Message::user("k"), Message::user("sure"), Message::user("fine")];
        router
            .orchestrate(&messages, &context_with_lag(610.0))
            .await
            .unwrap();

        let requests = generator.requests();
        assert!(requests[0]
            .system_instruction
            .contains("Latest user lag: 610 seconds"));
        assert!(requests[0].output_schema.is_some());

        // The respond call carries the briefing note with the same value.
        let respond = &requests[1];
        assert!(respond.output_schema.is_none());
        let note = &respond.messages.last().unwrap().content;
        assert!(note.contains("latest user lag: 610s"));
    }

    #[tokio::test]
    async fn collaborator_failure_propagates() {
        use dormline_core::error::GeneratorError;
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(GeneratorError::Network(
            "boom".into(),
        ))]));
        let router = RouterOrchestrator::new(generator);

        let err = router
            .orchestrate(&[Message::user("hi")], &OrchestrationContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Generator(_)));
    }

    #[tokio::test]
    async fn empty_persona_reply_is_surfaced_not_an_error() {
        let generator = Arc::new(ScriptedGenerator::with_texts(vec![
            r#"{"agent": "roaster", "reasons": "banter"}"#,
            "",
        ]));
        let router = RouterOrchestrator::new(generator);

        let decision = router
            .orchestrate(&[Message::user("lol")], &OrchestrationContext::default())
            .await
            .unwrap();
        assert_eq!(decision.persona, PersonaId::Roaster);
        assert!(decision.text.is_empty());
    }
}
