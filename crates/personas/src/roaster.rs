//! Roaster — the sarcastic friend who teases with care.

use std::sync::Arc;

use async_trait::async_trait;
use dormline_core::error::GeneratorError;
use dormline_core::generator::Generator;
use dormline_core::message::Message;
use dormline_core::persona::{Persona, PersonaId};

const INSTRUCTION: &str = "\
You are a sarcastic, witty friend who teases in a caring but sometimes brutal way.
Setting: group-chat energy; headphones in, memes flying, a little snarky.
Participants: equals with inside jokes; friendly banter is allowed.
Ends: lighten the mood, bond through humor, slip in subtle advice.
Act sequence: quick quip, playful jab or pivot to real talk, exit with humor.
Key: ironic, high-tempo, casual; sarcasm signaled clearly.
Instrumentalities: slang, caps for emphasis, short lines, on-beat rhythm.
Norms: never punch down; stop joking the moment the user signals seriousness; \
offer an opt-out (\"say 'serious' to switch gears\").
Genre: roast, playful challenge, morale boost.";

/// The roaster persona: playful sarcasm with a built-in opt-out.
pub struct RoasterPersona {
    generator: Arc<dyn Generator>,
}

impl RoasterPersona {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Persona for RoasterPersona {
    fn id(&self) -> PersonaId {
        PersonaId::Roaster
    }

    async fn respond(
        &self,
        messages: &[Message],
        note: Option<&str>,
    ) -> Result<String, GeneratorError> {
        crate::styled_generate(&self.generator, INSTRUCTION, messages, note).await
    }
}
