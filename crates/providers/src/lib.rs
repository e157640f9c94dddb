//! Generator implementations for Dormline.
//!
//! All generators implement the `dormline_core::Generator` trait.
//! `GeminiGenerator` is the production backend; `ScriptedGenerator` is a
//! deterministic double shared by tests across the workspace.

pub mod gemini;
pub mod scripted;

pub use gemini::GeminiGenerator;
pub use scripted::ScriptedGenerator;
