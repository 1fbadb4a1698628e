//! Generate Response use case.
//!
//! Wraps the completion gateway behind one uniform call per turn: prompt in,
//! text out, typed failure. Each attempt runs under a wall-clock timeout;
//! transient failures (timeout, rate limit, closed transport) are retried
//! with exponential backoff, non-transient failures escalate immediately.
//! An empty completion is a malformed response and feeds the same retry
//! path; a blank turn would desynchronize the displayed history.

use crate::config::RetryPolicy;
use crate::ports::completion::{CompletionError, CompletionGateway, CompletionRequest};
use colloquy_domain::{AgentProfile, ContextBundle, DebatePrompt, Topic};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced after the retry policy is exhausted
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation failed after {attempts} attempts: {reason}")]
    RetriesExhausted { attempts: u32, reason: String },

    #[error("Generation rejected: {0}")]
    Rejected(String),
}

/// Use case for producing one turn's text
pub struct ResponseGenerator<G: CompletionGateway> {
    gateway: Arc<G>,
    policy: RetryPolicy,
}

impl<G: CompletionGateway> ResponseGenerator<G> {
    pub fn new(gateway: Arc<G>, policy: RetryPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Generate the speaking agent's contribution.
    ///
    /// Returns the trimmed completion text, or a [`GenerationError`] once
    /// the bounded retry policy is spent.
    pub async fn generate(
        &self,
        profile: &AgentProfile,
        topic: Option<&Topic>,
        context: &ContextBundle,
        requesting_user: Option<&str>,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            system_prompt: DebatePrompt::system(profile),
            prompt: DebatePrompt::turn(topic.map(Topic::content), context),
            agent_id: profile.id().clone(),
            requesting_user: requesting_user.map(str::to_string),
        };

        let mut attempt = 0;
        loop {
            attempt += 1;

            match self.attempt(&request).await {
                Ok(text) => {
                    debug!(
                        "Agent {} responded on attempt {}",
                        profile.id(),
                        attempt
                    );
                    return Ok(text);
                }
                Err(e) if !e.is_transient() => {
                    warn!("Agent {} rejected by gateway: {}", profile.id(), e);
                    return Err(GenerationError::Rejected(e.to_string()));
                }
                Err(e) if attempt >= self.policy.max_attempts => {
                    warn!(
                        "Agent {} failed after {} attempts: {}",
                        profile.id(),
                        attempt,
                        e
                    );
                    return Err(GenerationError::RetriesExhausted {
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.policy.backoff_after(attempt);
                    warn!(
                        "Agent {} attempt {} failed ({}), retrying after {:?}",
                        profile.id(),
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One timed attempt, with strict validation of the completion.
    async fn attempt(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let call = self.gateway.complete(request);
        let text = match tokio::time::timeout(self.policy.turn_timeout, call).await {
            Ok(result) => result?,
            Err(_) => return Err(CompletionError::Timeout),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CompletionError::MalformedResponse);
        }
        Ok(trimmed.to_string())
    }
}
