//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`] — identifier newtypes for discussions, rooms, messages, agents
//! - [`topic::Topic`] — a validated discussion topic
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod ids;
pub mod string;
pub mod topic;
