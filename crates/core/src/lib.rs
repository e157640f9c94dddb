//! # Dormline Core
//!
//! Domain types, traits, and error definitions for the Dormline persona
//! orchestration service. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem boundary is a trait here: the generation collaborator
//! ([`Generator`]), the persona styles ([`Persona`]), and the orchestration
//! strategies ([`Orchestrator`]). Implementations live in their respective
//! crates, which keeps the dependency graph pointing inward and makes every
//! seam mockable in tests.

pub mod error;
pub mod generator;
pub mod message;
pub mod orchestrator;
pub mod persona;
pub mod timing;

// Re-export key types at crate root for ergonomics
pub use error::{GeneratorError, OrchestratorError};
pub use generator::{GenerateRequest, GenerateResponse, Generator, OutputSchema};
pub use message::{Message, Role};
pub use orchestrator::{Decision, OrchestrationContext, Orchestrator};
pub use persona::{Persona, PersonaDraft, PersonaId};
pub use timing::TimingDigest;
