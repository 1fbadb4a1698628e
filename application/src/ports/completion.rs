//! Completion gateway port
//!
//! Defines the interface for the AI-generation collaborator. The gateway is
//! treated as untrusted and unreliable; the response generator use case
//! wraps every call with a timeout and bounded retries.

use async_trait::async_trait;
use colloquy_domain::AgentId;
use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Malformed response from model")]
    MalformedResponse,

    #[error("Quota exhausted")]
    QuotaExhausted,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Completion failed: {0}")]
    Failed(String),
}

impl CompletionError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CompletionError::Timeout
                | CompletionError::RateLimited
                | CompletionError::TransportClosed
                | CompletionError::MalformedResponse
        )
    }
}

/// One completion call: prompt in, text out
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Persona/system framing for the speaking agent
    pub system_prompt: String,
    /// The turn prompt (topic + grounding context + instruction)
    pub prompt: String,
    /// Which agent is speaking
    pub agent_id: AgentId,
    /// Caller identity, passed through for the collaborator's attribution
    pub requesting_user: Option<String>,
}

/// Gateway to the AI completion service
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Execute one completion call
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
