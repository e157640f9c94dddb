//! Scripted generator — a deterministic double for tests.
//!
//! Returns a queue of canned responses in order and records every request
//! it receives, so tests can assert both on orchestration outcomes and on
//! prompt construction. Kept as a regular module (not `#[cfg(test)]`)
//! because orchestrator, gateway, and cli tests all script against it.

use std::sync::Mutex;

use async_trait::async_trait;
use dormline_core::error::GeneratorError;
use dormline_core::generator::{GenerateRequest, GenerateResponse, Generator};

/// A generator that replays a fixed sequence of responses.
///
/// Each call to `generate` pops the next entry. Panics if more calls are
/// made than responses were scripted — a test scripting mismatch, not a
/// runtime condition.
pub struct ScriptedGenerator {
    responses: Mutex<Vec<Result<String, GeneratorError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    cursor: Mutex<usize>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            cursor: Mutex::new(0),
        }
    }

    /// Script a sequence of plain-text replies.
    pub fn with_texts(texts: Vec<&str>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Script a single reply.
    pub fn single(text: &str) -> Self {
        Self::with_texts(vec![text])
    }

    /// How many calls have been made.
    pub fn call_count(&self) -> usize {
        *self.cursor.lock().unwrap()
    }

    /// Snapshot of every request received so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GeneratorError> {
        self.requests.lock().unwrap().push(request);

        let mut cursor = self.cursor.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *cursor >= responses.len() {
            panic!(
                "ScriptedGenerator: no more responses (call #{}, have {})",
                *cursor,
                responses.len()
            );
        }

        let response = responses[*cursor].clone();
        *cursor += 1;
        response.map(|text| GenerateResponse { text })
    }
}
