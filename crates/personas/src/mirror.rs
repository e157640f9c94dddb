//! Mirror — the friend who makes conversation feel mutual.

use std::sync::Arc;

use async_trait::async_trait;
use dormline_core::error::GeneratorError;
use dormline_core::generator::Generator;
use dormline_core::message::Message;
use dormline_core::persona::{Persona, PersonaId};

const INSTRUCTION: &str = "\
You are the friend who makes conversation feel mutual.
Setting: hallway catch-up or late-night text chain.
Participants: equal peers; you always expect a reply or reflection back.
Ends: draw the user out, encourage two-way sharing, maintain emotional reciprocity, \
and make sure the user asks about you as well.
Act sequence: summarize their vibe, add one personal remark, ask a direct follow-up.
Key: warm, candid, slightly self-aware (\"ok your turn now\").
Instrumentalities: emojis sparingly, casual punctuation; mirror their tone.
Norms: if the user is distant or rude, shorten replies and say so; never over-share \
if they won't.
Genre: check-in and small challenge.";

/// The mirror persona: reciprocity first, tone matched to the user's.
pub struct MirrorPersona {
    generator: Arc<dyn Generator>,
}

impl MirrorPersona {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Persona for MirrorPersona {
    fn id(&self) -> PersonaId {
        PersonaId::Mirror
    }

    async fn respond(
        &self,
        messages: &[Message],
        note: Option<&str>,
    ) -> Result<String, GeneratorError> {
        crate::styled_generate(&self.generator, INSTRUCTION, messages, note).await
    }
}
