//! Orchestrator parameters for use case loop control.
//!
//! [`OrchestratorConfig`] groups the static parameters that control turn
//! generation and context assembly. These are application-layer concerns,
//! not domain policy (the domain's only pacing knob is `Intensity`).

use colloquy_domain::ContextLimits;
use std::time::Duration;

/// Retry policy for generation calls.
///
/// `max_attempts` counts the first call too: the default of 2 means one
/// retry after the initial attempt. Backoff doubles per attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per turn, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles each subsequent retry.
    pub base_backoff: Duration,
    /// Wall-clock budget for a single completion call.
    pub turn_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_backoff: Duration::from_millis(500),
            turn_timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retrying after `attempt` (1-based) failed.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.base_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Context assembly parameters.
#[derive(Debug, Clone)]
pub struct ContextParams {
    /// How many chronological room messages to pull in.
    pub recent_messages: usize,
    /// How many semantic snippets to request.
    pub retrieval_top_k: usize,
    /// Size caps on the assembled bundle.
    pub limits: ContextLimits,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            recent_messages: 10,
            retrieval_top_k: 5,
            limits: ContextLimits::default(),
        }
    }
}

/// All tunables of the discussion orchestrator.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    pub retry: RetryPolicy,
    pub context: ContextParams,
}
