//! Error types for the Dormline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; surfaces that cross
//! contexts (the CLI) box them rather than funneling through an umbrella.

use thiserror::Error;

/// Errors from the generation collaborator (network/service boundary).
///
/// Note that *empty or malformed text* from the collaborator is not an
/// error — callers are required to treat that as an expected condition.
/// These variants cover the transport and service failures only.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("API key not configured: {0}")]
    MissingApiKey(String),

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from generator: {0}")]
    InvalidResponse(String),
}

impl GeneratorError {
    /// Whether this failure is a missing-credentials/configuration problem
    /// rather than a transient pipeline failure. The gateway maps the two
    /// to distinct reported statuses.
    pub fn is_credential_failure(&self) -> bool {
        match self {
            Self::MissingApiKey(_) => true,
            Self::ApiError { status_code, .. } if *status_code == 401 || *status_code == 403 => {
                true
            }
            other => {
                let msg = other.to_string().to_lowercase();
                msg.contains("api key") || msg.contains("api_key") || msg.contains("unauthorized")
            }
        }
    }
}

/// Errors surfaced by an orchestration strategy.
///
/// Malformed structured output from the collaborator never reaches this
/// type — orchestrators recover from it locally by defaulting. Only
/// collaborator-level failures propagate.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("generation collaborator failed: {0}")]
    Generator(#[from] GeneratorError),

    /// The fallback chain ran to its end and still produced no usable
    /// text. A Decision with empty final text is never returned; this
    /// explicit failure takes its place.
    #[error("fallback chain exhausted: no persona produced usable text")]
    EmptyFinalText,
}

impl OrchestratorError {
    /// See [`GeneratorError::is_credential_failure`].
    pub fn is_credential_failure(&self) -> bool {
        match self {
            Self::Generator(err) => err.is_credential_failure(),
            Self::EmptyFinalText => false,
        }
    }
}
