//! Digest derivation from raw timestamps.
//!
//! Per-turn lag is the whole-second distance from the previous message,
//! clamped at zero (clock skew must not produce negative lags). Duration
//! and averages round to one decimal so the rendered digests stay compact.

use chrono::{DateTime, Utc};
use dormline_core::message::{Message, Role};
use dormline_core::timing::TimingDigest;

/// Derive a timing digest from a conversation history.
///
/// Messages without timestamps contribute to the turn count but to no lag
/// statistic; a fully untimestamped history yields only `total_turns`, and
/// an empty history yields an empty digest.
pub fn digest_from_history(messages: &[Message]) -> TimingDigest {
    if messages.is_empty() {
        return TimingDigest::default();
    }

    // Lag from the previous message, for every message where both
    // timestamps are known.
    let lags: Vec<(Role, Option<f64>)> = messages
        .iter()
        .enumerate()
        .map(|(idx, msg)| {
            let prev = idx.checked_sub(1).and_then(|i| messages[i].sent_at);
            (msg.role, lag_secs(prev, msg.sent_at))
        })
        .collect();

    let timestamps: Vec<DateTime<Utc>> = messages.iter().filter_map(|m| m.sent_at).collect();
    let conversation_minutes = match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => {
            let minutes = (*last - *first).num_milliseconds() as f64 / 60_000.0;
            Some(round1(minutes))
        }
        _ => None,
    };

    let user_lags: Vec<f64> = lags
        .iter()
        .filter(|(role, lag)| *role == Role::User && lag.is_some())
        .map(|(_, lag)| lag.unwrap())
        .collect();
    let assistant_lags: Vec<f64> = lags
        .iter()
        .filter(|(role, lag)| *role == Role::Assistant && lag.is_some())
        .map(|(_, lag)| lag.unwrap())
        .collect();

    let latest_user_lag_secs = lags
        .iter()
        .rev()
        .find(|(role, lag)| *role == Role::User && lag.is_some())
        .and_then(|(_, lag)| *lag);

    TimingDigest {
        total_turns: Some(messages.len()),
        conversation_minutes,
        latest_user_lag_secs,
        average_user_lag_secs: average(&user_lags),
        average_assistant_lag_secs: average(&assistant_lags),
    }
}

fn lag_secs(prev: Option<DateTime<Utc>>, current: Option<DateTime<Utc>>) -> Option<f64> {
    let (prev, current) = (prev?, current?);
    let secs = (current - prev).num_milliseconds() as f64 / 1000.0;
    Some(secs.round().max(0.0))
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round1(values.iter().sum::<f64>() / values.len() as f64))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn empty_history_yields_empty_digest() {
        assert!(digest_from_history(&[]).is_empty());
    }

    #[test]
    fn untimestamped_history_yields_turn_count_only() {
        let digest = digest_from_history(&[Message::user("a"), Message::assistant("b")]);
        assert_eq!(digest.total_turns, Some(2));
        assert!(digest.conversation_minutes.is_none());
        assert!(digest.latest_user_lag_secs.is_none());
    }

    #[test]
    fn computes_lags_and_duration() {
        let history = vec![
            Message::user("hey").with_sent_at(at(0)),
            Message::assistant("hi!").with_sent_at(at(5)),
            Message::user("sorry was in class").with_sent_at(at(605)),
        ];
        let digest = digest_from_history(&history);
        assert_eq!(digest.total_turns, Some(3));
        // 605 seconds ≈ 10.1 minutes
        assert_eq!(digest.conversation_minutes, Some(10.1));
        assert_eq!(digest.latest_user_lag_secs, Some(600.0));
        assert_eq!(digest.average_user_lag_secs, Some(600.0));
        assert_eq!(digest.average_assistant_lag_secs, Some(5.0));
    }

    #[test]
    fn negative_lag_clamps_to_zero() {
        let history = vec![
            Message::user("a").with_sent_at(at(100)),
            Message::assistant("b").with_sent_at(at(90)),
        ];
        let digest = digest_from_history(&history);
        assert_eq!(digest.average_assistant_lag_secs, Some(0.0));
    }

    #[test]
    fn gaps_in_timestamps_skip_lag_but_keep_duration() {
        let history = vec![
            Message::user("a").with_sent_at(at(0)),
            Message::assistant("b"), // no timestamp
            Message::user("c").with_sent_at(at(120)),
        ];
        let digest = digest_from_history(&history);
        // c's predecessor has no timestamp, so no user lag is derivable
        assert!(digest.latest_user_lag_secs.is_none());
        assert_eq!(digest.conversation_minutes, Some(2.0));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let history = vec![
            Message::assistant("a").with_sent_at(at(0)),
            Message::user("b").with_sent_at(at(10)),
            Message::assistant("c").with_sent_at(at(11)),
            Message::user("d").with_sent_at(at(16)),
        ];
        let digest = digest_from_history(&history);
        // user lags 10 and 5 → 7.5
        assert_eq!(digest.average_user_lag_secs, Some(7.5));
        assert_eq!(digest.latest_user_lag_secs, Some(5.0));
    }
}
