//! Application layer for colloquy
//!
//! Use cases and ports. The [`use_cases::orchestrator::DiscussionOrchestrator`]
//! drives multi-agent debates through injected collaborators; the [`ports`]
//! module defines the interfaces those collaborators implement in the
//! infrastructure layer.

pub mod config;
pub mod ports;
pub mod use_cases;

pub use config::{ContextParams, OrchestratorConfig, RetryPolicy};
pub use use_cases::assemble_context::ContextAssembler;
pub use use_cases::generate_response::{GenerationError, ResponseGenerator};
pub use use_cases::orchestrator::{
    CreateDiscussionInput, DiscussionOrchestrator, DiscussionSnapshot, ExecutionReport,
    OrchestratorError,
};
