//! Agent directory port
//!
//! Resolves participant ids to authored personas. Persona authoring itself
//! lives outside this system; the orchestrator only reads.

use crate::ports::room_directory::DirectoryError;
use async_trait::async_trait;
use colloquy_domain::{AgentId, AgentProfile};

/// Read-only access to agent personas
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// Look up an agent's profile, `None` when the id is unknown
    async fn find_agent(&self, id: &AgentId) -> Result<Option<AgentProfile>, DirectoryError>;
}
