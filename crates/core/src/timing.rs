//! Timing telemetry digest — derived, never stored.
//!
//! Every field is optional: a history without timestamps produces an empty
//! digest, and downstream renderings are required to make the absence
//! explicit rather than silently assuming zero.

use serde::{Deserialize, Serialize};

/// Numeric timing signals derived from a conversation history.
///
/// Computed fresh per orchestration call by `dormline-telemetry`; there is
/// no persistence and no identity beyond the call. Duration and averages
/// carry one-decimal rounding, per-turn lags are whole seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingDigest {
    /// Total turns in the conversation so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_turns: Option<usize>,

    /// Minutes between the first and last timestamped message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_minutes: Option<f64>,

    /// Seconds the user took before their most recent message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_user_lag_secs: Option<f64>,

    /// Average seconds the user takes to respond.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_user_lag_secs: Option<f64>,

    /// Average seconds between assistant messages and their predecessors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_assistant_lag_secs: Option<f64>,
}

impl TimingDigest {
    /// Whether no signal at all is present.
    pub fn is_empty(&self) -> bool {
        self.total_turns.is_none()
            && self.conversation_minutes.is_none()
            && self.latest_user_lag_secs.is_none()
            && self.average_user_lag_secs.is_none()
            && self.average_assistant_lag_secs.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_digest_is_empty() {
        assert!(TimingDigest::default().is_empty());
    }

    #[test]
    fn any_field_makes_it_non_empty() {
        let digest = TimingDigest {
            latest_user_lag_secs: Some(12.0),
            ..Default::default()
        };
        assert!(!digest.is_empty());
    }

    #[test]
    fn absent_fields_are_skipped_in_json() {
        let digest = TimingDigest {
            total_turns: Some(4),
            ..Default::default()
        };
        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.contains("total_turns"));
        assert!(!json.contains("conversation_minutes"));
    }
}
