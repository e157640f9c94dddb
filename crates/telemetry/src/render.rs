//! Prompt-ready renderings of a timing digest.
//!
//! Two forms: `summarize` feeds the classification prompt; `briefing` is
//! worded for out-of-band injection to a single chosen persona. Both keep
//! the digest numbers verbatim. `briefing` renders missing numerics as the
//! literal token `unknown` so a persona is never misled into assuming zero.

use dormline_core::persona::PersonaId;
use dormline_core::timing::TimingDigest;

/// Fixed line emitted when no timing signal is present — never an empty
/// string, so downstream prompts stay well-formed.
pub const NO_TELEMETRY_LINE: &str = "- No telemetry captured yet.";

/// Render only the fields that are present, as a bulleted list.
pub fn summarize(digest: &TimingDigest) -> String {
    let mut lines = Vec::new();
    if let Some(turns) = digest.total_turns {
        lines.push(format!("- Turns so far: {turns}"));
    }
    if let Some(minutes) = digest.conversation_minutes {
        lines.push(format!("- Conversation duration: {minutes} minutes"));
    }
    if let Some(lag) = digest.latest_user_lag_secs {
        lines.push(format!("- Latest user lag: {lag} seconds"));
    }
    if let Some(lag) = digest.average_user_lag_secs {
        lines.push(format!("- Avg user response: {lag} seconds"));
    }
    if let Some(lag) = digest.average_assistant_lag_secs {
        lines.push(format!("- Avg assistant cadence: {lag} seconds"));
    }

    if lines.is_empty() {
        return NO_TELEMETRY_LINE.to_string();
    }
    lines.join("\n")
}

/// Render persona-specific guidance plus the timing facts, for direct
/// injection as an out-of-band instruction to the chosen persona.
pub fn briefing(persona: PersonaId, digest: &TimingDigest) -> String {
    let key_line = match persona {
        PersonaId::Confidant => {
            "Key: grounded, encouraging, helps plan without guilt; honor requests for seriousness."
        }
        PersonaId::Mirror => {
            "Key: reciprocity first, mirror tone, call out distance, invite their reply."
        }
        PersonaId::Roaster => {
            "Key: playful sarcasm, keep it safe, offer opt-out if vibe shifts."
        }
    };

    let lines = [
        "Orchestrator note (speaking cues):".to_string(),
        "Setting: cozy dorm lounge chat between longtime college friends.".to_string(),
        "Participants: two peers, casual parity.".to_string(),
        "Ends: keep the user supported while matching their pace and energy.".to_string(),
        format!(
            "Key timing cues: latest user lag: {}, avg user lag: {}.",
            seconds_or_unknown(digest.latest_user_lag_secs),
            seconds_or_unknown(digest.average_user_lag_secs),
        ),
        format!("Turns so far: {}.", count_or_unknown(digest.total_turns)),
        key_line.to_string(),
    ];
    lines.join("\n")
}

fn seconds_or_unknown(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}s"),
        None => "unknown".to_string(),
    }
}

fn count_or_unknown(value: Option<usize>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "unknown".to_string(),
    }
}
