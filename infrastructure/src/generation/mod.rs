//! Completion gateway adapters

pub mod persona;
pub mod scripted;

pub use persona::PersonaStubGateway;
pub use scripted::ScriptedCompletionGateway;
