//! Gemini native generator implementation.
//!
//! Uses the `generateContent` endpoint of the Generative Language API
//! directly (not an OpenAI-compatible proxy).
//!
//! Features:
//! - `x-goog-api-key` header authentication
//! - System instruction as the top-level `systemInstruction` field
//! - Structured output via `generationConfig.responseMimeType` +
//!   `responseSchema`
//! - Role mapping: user → "user", assistant → "model"

use async_trait::async_trait;
use dormline_core::error::GeneratorError;
use dormline_core::generator::{GenerateRequest, GenerateResponse, Generator};
use dormline_core::message::{Message, Role};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` API generator.
#[derive(Debug)]
pub struct GeminiGenerator {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a new Gemini generator.
    ///
    /// Fails with `MissingApiKey` when the key is empty so a misconfigured
    /// deployment surfaces at startup rather than on the first chat call.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Result<Self, GeneratorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeneratorError::MissingApiKey(
                "GEMINI_API_KEY is not set and no api_key is configured".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        Ok(Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            model: model.into(),
            temperature,
            client,
        })
    }

    /// Build from application config.
    pub fn from_config(config: &dormline_config::AppConfig) -> Result<Self, GeneratorError> {
        Self::new(
            config.api_key.clone().unwrap_or_default(),
            &config.model,
            config.temperature,
        )
    }

    /// Create with a custom base URL (for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Convert domain messages to the API's `contents` array.
    fn to_api_contents(messages: &[Message]) -> Vec<ApiContent> {
        messages
            .iter()
            .map(|msg| ApiContent {
                role: match msg.role {
                    Role::User => "user".into(),
                    Role::Assistant => "model".into(),
                },
                parts: vec![ApiPart {
                    text: msg.content.clone(),
                }],
            })
            .collect()
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GeneratorError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let generation_config = match &request.output_schema {
            Some(schema) => {
                debug!(schema = %schema.name, "Gemini: requesting structured output");
                GenerationConfig {
                    temperature: self.temperature,
                    response_mime_type: Some("application/json".into()),
                    response_schema: Some(schema.schema.clone()),
                }
            }
            None => GenerationConfig {
                temperature: self.temperature,
                response_mime_type: None,
                response_schema: None,
            },
        };

        let body = ApiRequest {
            contents: Self::to_api_contents(&request.messages),
            system_instruction: ApiSystemInstruction {
                parts: vec![ApiPart {
                    text: request.system_instruction,
                }],
            },
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini: API request failed");
            return Err(GeneratorError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        // No candidates is an expected condition (safety block, empty
        // output) — surface it as empty text, not an error.
        let text = api_response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(GenerateResponse { text })
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: ApiSystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct ApiContent {
    role: String,
    parts: Vec<ApiPart>,
}

#[derive(Serialize, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct ApiSystemInstruction {
    parts: Vec<ApiPart>,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    content: ApiCandidateContent,
}

#[derive(Deserialize)]
struct ApiCandidateContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = GeminiGenerator::new("", "gemini-2.0-flash", 0.7).unwrap_err();
        assert!(err.is_credential_failure());
    }

    #[test]
    fn roles_map_to_api_names() {
        let contents = GeminiGenerator::to_api_contents(&[
            Message::user("hey"),
            Message::assistant("hi, what's up"),
        ]);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts[0].text, "hi, what's up");
    }

    #[test]
    fn response_parsing_handles_missing_candidates() {
        let parsed: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());

        let parsed: ApiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hello "},{"text":"there"}]}}]}"#,
        )
        .unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.clone())
            .collect();
        assert_eq!(text, "hello there");
    }
}
