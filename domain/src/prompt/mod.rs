//! Prompt templates for the debate flow

pub mod debate;

pub use debate::DebatePrompt;
