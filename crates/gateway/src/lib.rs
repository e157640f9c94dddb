//! HTTP API gateway for Dormline.
//!
//! Exposes the chat endpoint and a health check. The gateway is the
//! mechanical layer: it parses timestamps, derives the timing context,
//! hands the conversation to the active orchestrator, and maps the error
//! taxonomy to distinct statuses. All decision logic lives below it.
//!
//! Built on Axum.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use dormline_core::error::OrchestratorError;
use dormline_core::message::{Message, Role};
use dormline_core::orchestrator::{OrchestrationContext, Orchestrator};
use dormline_core::persona::PersonaId;
use dormline_core::timing::TimingDigest;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<dyn Orchestrator>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/chat", post(chat_handler))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &dormline_config::GatewayConfig,
    orchestrator: Arc<dyn Orchestrator>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(GatewayState { orchestrator });
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Gateway listening");
    axum::serve(listener, router).await?;
    Ok(())
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    history: Vec<TurnDto>,
}

#[derive(Deserialize)]
struct TurnDto {
    role: String,
    content: String,
    /// RFC 3339 string or unix epoch milliseconds; anything unparseable
    /// is treated as absent.
    #[serde(default)]
    sent_at: Option<SentAtDto>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SentAtDto {
    Millis(i64),
    Text(String),
}

#[derive(Serialize)]
struct ChatResponse {
    assistant_message: String,
    persona: PersonaId,
    rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contributors: Option<std::collections::BTreeSet<PersonaId>>,
    timing: TimingDigest,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    if request.history.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "history array is required" })),
        )
            .into_response();
    }

    let messages: Vec<Message> = request.history.iter().map(to_message).collect();
    let context = OrchestrationContext {
        timing: dormline_telemetry::digest_from_history(&messages),
    };

    match state.orchestrator.orchestrate(&messages, &context).await {
        Ok(decision) => {
            info!(
                persona = %decision.persona,
                rationale = %decision.rationale,
                "chat: decision made"
            );
            Json(ChatResponse {
                assistant_message: decision.text,
                persona: decision.persona,
                rationale: decision.rationale,
                contributors: decision.contributors,
                timing: context.timing,
            })
            .into_response()
        }
        Err(err) => error_response(err).into_response(),
    }
}

/// Map the error taxonomy to distinct reported statuses: a
/// missing-credentials failure is the operator's problem (400, actionable
/// message); everything else surfaces as a single generic pipeline error.
fn error_response(err: OrchestratorError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is_credential_failure() {
        error!(error = %err, "chat: generator credentials missing");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "generator API key not found".into(),
                details: None,
            }),
        )
    } else {
        error!(error = %err, "chat: pipeline error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "pipeline error".into(),
                details: Some(err.to_string()),
            }),
        )
    }
}

// ── History parsing ───────────────────────────────────────────────────────

fn to_message(turn: &TurnDto) -> Message {
    let role = if turn.role == "user" {
        Role::User
    } else {
        Role::Assistant
    };
    Message {
        role,
        content: turn.content.clone(),
        sent_at: turn.sent_at.as_ref().and_then(parse_sent_at),
    }
}

fn parse_sent_at(raw: &SentAtDto) -> Option<DateTime<Utc>> {
    match raw {
        SentAtDto::Millis(ms) => DateTime::from_timestamp_millis(*ms),
        SentAtDto::Text(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use dormline_core::error::GeneratorError;
    use dormline_orchestrator::RouterOrchestrator;
    use dormline_providers::ScriptedGenerator;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with_responses(responses: Vec<Result<String, GeneratorError>>) -> Router {
        let generator = Arc::new(ScriptedGenerator::new(responses));
        let orchestrator = Arc::new(RouterOrchestrator::new(generator));
        build_router(Arc::new(GatewayState { orchestrator }))
    }

    async fn post_chat(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = app_with_responses(vec![]);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chat_returns_decision_and_timing() {
        let app = app_with_responses(vec![
            Ok(r#"{"agent": "confidant", "reasons": "finals stress"}"#.into()),
            Ok("one thing at a time, ok?".into()),
        ]);

        let (status, body) = post_chat(
            app,
            serde_json::json!({
                "history": [
                    { "role": "assistant", "content": "how's it going?",
                      "sent_at": "2026-02-01T10:00:00Z" },
                    { "role": "user", "content": "stressed about finals, can't balance everything",
                      "sent_at": "2026-02-01T10:01:00Z" }
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["persona"], "confidant");
        assert_eq!(body["assistant_message"], "one thing at a time, ok?");
        assert_eq!(body["rationale"], "finals stress");
        assert_eq!(body["timing"]["total_turns"], 2);
        assert_eq!(body["timing"]["latest_user_lag_secs"], 60.0);
    }

    #[tokio::test]
    async fn empty_history_is_rejected() {
        let app = app_with_responses(vec![]);
        let (status, body) = post_chat(app, serde_json::json!({ "history": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "history array is required");
    }

    #[tokio::test]
    async fn credential_failure_maps_to_bad_request() {
        let app = app_with_responses(vec![Err(GeneratorError::MissingApiKey(
            "GEMINI_API_KEY not set".into(),
        ))]);
        let (status, body) = post_chat(
            app,
            serde_json::json!({ "history": [{ "role": "user", "content": "hi" }] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "generator API key not found");
    }

    #[tokio::test]
    async fn other_failures_map_to_generic_pipeline_error() {
        let app = app_with_responses(vec![Err(GeneratorError::Network(
            "connection refused".into(),
        ))]);
        let (status, body) = post_chat(
            app,
            serde_json::json!({ "history": [{ "role": "user", "content": "hi" }] }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "pipeline error");
        assert!(body["details"].as_str().unwrap().contains("connection refused"));
    }

    #[test]
    fn timestamps_parse_from_both_wire_shapes() {
        let from_millis = parse_sent_at(&SentAtDto::Millis(1_700_000_000_000)).unwrap();
        assert_eq!(from_millis.timestamp(), 1_700_000_000);

        let from_text = parse_sent_at(&SentAtDto::Text("2026-02-01T10:00:00Z".into())).unwrap();
        assert_eq!(from_text.timestamp(), 1_769_940_000);

        assert!(parse_sent_at(&SentAtDto::Text("not a date".into())).is_none());
    }

    #[test]
    fn unknown_roles_fall_back_to_assistant() {
        let turn = TurnDto {
            role: "model".into(),
            content: "hi".into(),
            sent_at: None,
        };
        assert_eq!(to_message(&turn).role, Role::Assistant);
    }
}
