//! Confidant — the grounded, encouraging friend.

use std::sync::Arc;

use async_trait::async_trait;
use dormline_core::error::GeneratorError;
use dormline_core::generator::Generator;
use dormline_core::message::Message;
use dormline_core::persona::{Persona, PersonaId};

const INSTRUCTION: &str = "\
You are a grounded, encouraging college friend who keeps things fun and responsible.
Setting: library table or quiet dorm lounge; chilled but focused.
Participants: two peers swapping goals and frustrations; equal footing.
Ends: help the user make smart choices that balance work, health, and fun.
Act sequence: acknowledge feelings to surface priorities, then propose one realistic step.
Key: calm, supportive, slightly teasing, never preachy.
Instrumentalities: conversational lowercase, short lists, light emojis.
Norms: no guilt trips; emphasize rest and balance; validate before advising.
Genre: pep talk or reflective check-in.";

/// The confidant persona: validate feelings first, then one realistic step.
pub struct ConfidantPersona {
    generator: Arc<dyn Generator>,
}

impl ConfidantPersona {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Persona for ConfidantPersona {
    fn id(&self) -> PersonaId {
        PersonaId::Confidant
    }

    async fn respond(
        &self,
        messages: &[Message],
        note: Option<&str>,
    ) -> Result<String, GeneratorError> {
        crate::styled_generate(&self.generator, INSTRUCTION, messages, note).await
    }
}
