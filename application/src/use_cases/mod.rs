//! Use cases - the application's entry points
//!
//! - [`assemble_context`] — gather bounded grounding for a turn
//! - [`generate_response`] — one turn's generation with timeout + retries
//! - [`orchestrator`] — the discussion lifecycle state machine and turn loop

pub mod assemble_context;
pub mod generate_response;
pub mod orchestrator;

pub use assemble_context::ContextAssembler;
pub use generate_response::{GenerationError, ResponseGenerator};
pub use orchestrator::{
    CreateDiscussionInput, DiscussionOrchestrator, DiscussionSnapshot, ExecutionReport,
    OrchestratorError,
};
