//! Generator trait — the abstraction over the generation collaborator.
//!
//! A Generator knows how to turn a conversation plus a behavioral
//! instruction into text, optionally constrained to machine-parseable JSON.
//! The collaborator may return malformed or empty text; callers must treat
//! that as an expected, not exceptional, condition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::message::Message;

/// A request for the collaborator to produce JSON conforming to a named
/// schema. The schema body uses the collaborator's own schema dialect
/// (for Gemini, the OpenAPI-style `responseSchema` shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// A short name identifying the schema (for logs and diagnostics).
    pub name: String,

    /// The schema body.
    pub schema: serde_json::Value,
}

/// One generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The conversation, oldest first.
    pub messages: Vec<Message>,

    /// The behavioral instruction (system prompt) for this call.
    pub system_instruction: String,

    /// When present, ask the collaborator for JSON matching this schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
}

/// The collaborator's reply. `text` may be empty or, for schema-constrained
/// calls, unparseable — both are expected conditions for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// The generation collaborator boundary.
///
/// The production implementation talks to Gemini over HTTP; tests use a
/// scripted implementation. Orchestrators and personas call `generate`
/// without knowing which backend is behind it.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g., "gemini").
    fn name(&self) -> &str;

    /// Run one generation call.
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<GenerateResponse, GeneratorError>;
}
