//! The fixed persona response styles for Dormline.
//!
//! Each persona wraps one behavioral instruction and forwards the
//! conversation to the generation collaborator — no retries, no fallback,
//! no schema constraint. The closed set is enumerated by [`PersonaSet`];
//! string-to-persona validation happens before this crate is reached.

pub mod confidant;
pub mod mirror;
pub mod roaster;
pub mod set;

pub use confidant::ConfidantPersona;
pub use mirror::MirrorPersona;
pub use roaster::RoasterPersona;
pub use set::PersonaSet;

use std::sync::Arc;

use dormline_core::error::GeneratorError;
use dormline_core::generator::{GenerateRequest, Generator};
use dormline_core::message::Message;

/// Shared respond path for all personas: clone the conversation, append
/// the out-of-band note (if any) as one extra assistant turn, and invoke
/// the collaborator with the persona's fixed instruction. The input slice
/// is never mutated; collaborator errors propagate unchanged.
pub(crate) async fn styled_generate(
    generator: &Arc<dyn Generator>,
    instruction: &str,
    messages: &[Message],
    note: Option<&str>,
) -> Result<String, GeneratorError> {
    let mut contents = messages.to_vec();
    if let Some(note) = note {
        contents.push(Message::assistant(note));
    }

    let response = generator
        .generate(GenerateRequest {
            messages: contents,
            system_instruction: instruction.to_string(),
            output_schema: None,
        })
        .await?;

    Ok(response.text)
}
