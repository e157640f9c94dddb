//! Synthesizer strategy: draft with every persona, then blend.
//!
//! Three phases — a concurrent draft fan-out (the three personas have no
//! data dependency on each other), one synthesis call over the labeled
//! drafts, and a validate/fallback step that guarantees a non-empty reply.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use dormline_core::error::OrchestratorError;
use dormline_core::generator::{GenerateRequest, Generator, OutputSchema};
use dormline_core::message::Message;
use dormline_core::orchestrator::{Decision, OrchestrationContext, Orchestrator};
use dormline_core::persona::{PersonaDraft, PersonaId};
use dormline_personas::PersonaSet;
use futures::future;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Fixed rationale when the synthesis result is unusable.
pub const SYNTH_FALLBACK_RATIONALE: &str = "Defaulted to mirror because synthesis failed";

/// Placeholder shown in the synthesis prompt for a persona that produced
/// no draft.
const EMPTY_DRAFT_PLACEHOLDER: &str = "(no draft)";

/// Fan-out-and-blend orchestrator.
pub struct SynthesizerOrchestrator {
    generator: Arc<dyn Generator>,
    personas: PersonaSet,
}

impl SynthesizerOrchestrator {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            personas: PersonaSet::new(generator.clone()),
            generator,
        }
    }

    /// Collect one draft per persona, concurrently.
    ///
    /// Per-draft isolation: a failed draft is logged and substituted with
    /// an empty draft rather than aborting the fan-out — the fallback
    /// chain downstream guarantees the final reply is still non-empty.
    async fn collect_drafts(&self, messages: &[Message]) -> Vec<PersonaDraft> {
        let futures = self.personas.iter().map(|persona| async move {
            let text = match persona.respond(messages, None).await {
                Ok(text) => text.trim().to_string(),
                Err(err) => {
                    warn!(persona = %persona.id(), error = %err,
                        "synthesizer: draft failed, substituting empty draft");
                    String::new()
                }
            };
            PersonaDraft {
                persona: persona.id(),
                text,
            }
        });
        future::join_all(futures).await
    }

    /// Render all drafts as a labeled block for the synthesis prompt.
    fn draft_digest(drafts: &[PersonaDraft]) -> String {
        drafts
            .iter()
            .map(|draft| {
                let text = if draft.text.is_empty() {
                    EMPTY_DRAFT_PLACEHOLDER
                } else {
                    &draft.text
                };
                format!("Persona: {}\nReply:\n{}", draft.persona, text)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn synthesis_instruction() -> String {
        r#"You are the synthesizer for a laid-back college-friend chatbot.
You receive draft replies from three personas: "confidant", "mirror", and "roaster".

Work through:
  1) What vibe and needs the user is signaling in the latest exchange.
  2) Strengths and risks of each draft (tone, safety, usefulness).
  3) Whether to use one draft as-is, lightly edit it, or weave two together — only if the result still sounds like ONE clear persona.

Constraints:
- Output JSON only; no markdown or commentary.
- Keep the final reply under ~120 words, conversational lowercase, emoji sparingly.
- Safety overrides jokes: if the user asks for serious support or vents heavy topics, anchor on "confidant".
- If the user is distant or terse or needs reciprocity, anchor on "mirror".
- If it is playful low-stakes banter, anchor on "roaster".

Return exactly:
{"agent": "mirror", "response": "final text to send to the user", "reasons": "brief note on why this persona/edits work", "components": ["mirror"]}"#
            .to_string()
    }

    fn synthesis_schema() -> OutputSchema {
        OutputSchema {
            name: "persona_synthesis".into(),
            schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "agent": { "type": "STRING" },
                    "response": { "type": "STRING" },
                    "reasons": { "type": "STRING" },
                    "components": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["agent", "response"]
            }),
        }
    }

    fn draft_text<'a>(drafts: &'a [PersonaDraft], persona: PersonaId) -> &'a str {
        drafts
            .iter()
            .find(|d| d.persona == persona)
            .map(|d| d.text.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Default, Deserialize)]
struct SynthesisDto {
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    reasons: Option<String>,
    #[serde(default)]
    components: Option<Vec<String>>,
}

#[async_trait]
impl Orchestrator for SynthesizerOrchestrator {
    fn name(&self) -> &str {
        "synthesizer"
    }

    async fn orchestrate(
        &self,
        messages: &[Message],
        _context: &OrchestrationContext,
    ) -> Result<Decision, OrchestratorError> {
        // ── Phase 1: Draft (concurrent fan-out) ──
        let drafts = self.collect_drafts(messages).await;
        debug!(
            drafts = drafts.iter().filter(|d| !d.text.is_empty()).count(),
            "synthesizer: drafts collected"
        );

        // ── Phase 2: Synthesize ──
        let mut contents = messages.to_vec();
        contents.push(Message::user(format!(
            "Candidate replies from your specialists:\n\n{}\n\nChoose or edit the best fit and respond with JSON matching the schema.",
            Self::draft_digest(&drafts)
        )));

        let result = self
            .generator
            .generate(GenerateRequest {
                messages: contents,
                system_instruction: Self::synthesis_instruction(),
                output_schema: Some(Self::synthesis_schema()),
            })
            .await?;

        // ── Phase 3: Validate / Fallback ──
        let dto = match serde_json::from_str::<SynthesisDto>(&result.text) {
            Ok(dto) => dto,
            Err(_) => {
                warn!("synthesizer: synthesis output unparseable, falling back");
                SynthesisDto::default()
            }
        };

        let persona = match dto.agent.as_deref().and_then(PersonaId::parse) {
            Some(persona) => persona,
            None => {
                warn!(agent = ?dto.agent, "synthesizer: anchor outside closed set, forcing default");
                PersonaId::DEFAULT
            }
        };

        let rationale = dto
            .reasons
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| SYNTH_FALLBACK_RATIONALE.to_string());

        let contributors: Option<BTreeSet<PersonaId>> = dto.components.map(|names| {
            names
                .iter()
                .filter_map(|name| PersonaId::parse(name))
                .collect()
        });

        let mut text = dto
            .response
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| Self::draft_text(&drafts, persona).to_string());

        // Last resort: one corrective direct call to the anchor persona
        // rather than returning an empty message.
        if text.is_empty() {
            info!(persona = %persona, "synthesizer: empty reply, issuing corrective direct call");
            text = self
                .personas
                .get(persona)
                .respond(messages, None)
                .await?
                .trim()
                .to_string();
        }
        if text.is_empty() {
            return Err(OrchestratorError::EmptyFinalText);
        }

        info!(persona = %persona, "synthesizer: reply assembled");
        Ok(Decision {
            persona,
            rationale,
            text,
            contributors,
        })
    }
}
