//! Timing telemetry for Dormline.
//!
//! Derives numeric timing signals from a timestamped conversation history
//! (turn count, lag statistics) and renders them as compact textual
//! digests consumable by classification and persona prompts. Nothing here
//! is persisted — a digest is computed fresh per orchestration call.

pub mod digest;
pub mod render;

pub use digest::digest_from_history;
pub use render::{briefing, summarize, NO_TELEMETRY_LINE};
