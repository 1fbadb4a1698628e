//! File-backed configuration with defaults.
//!
//! Example configuration:
//!
//! ```toml
//! [discussion]
//! intensity = "high"
//!
//! [generation]
//! max_attempts = 3
//! backoff_ms = 250
//! turn_timeout_secs = 30
//!
//! [context]
//! recent_messages = 20
//! retrieval_top_k = 8
//!
//! [journal]
//! path = "colloquy.journal.jsonl"
//! ```

use colloquy_application::{ContextParams, OrchestratorConfig, RetryPolicy};
use colloquy_domain::{ContextLimits, DomainError, Intensity};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration file structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub discussion: FileDiscussionConfig,
    pub generation: FileGenerationConfig,
    pub context: FileContextConfig,
    pub journal: FileJournalConfig,
}

impl FileConfig {
    /// Convert the tunable sections into orchestrator parameters
    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            retry: self.generation.to_retry_policy(),
            context: self.context.to_context_params(),
        }
    }
}

/// Discussion defaults (`[discussion]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Default intensity for new discussions: "low", "normal", or "high"
    pub intensity: String,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            intensity: "normal".to_string(),
        }
    }
}

impl FileDiscussionConfig {
    /// Parse the configured intensity, failing fast on unknown values
    pub fn intensity(&self) -> Result<Intensity, DomainError> {
        self.intensity.parse()
    }
}

/// Generation retry policy (`[generation]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Total attempts per turn, including the first
    pub max_attempts: u32,
    /// Backoff before the first retry, in milliseconds
    pub backoff_ms: u64,
    /// Wall-clock budget per completion call, in seconds
    pub turn_timeout_secs: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_ms: 500,
            turn_timeout_secs: 60,
        }
    }
}

impl FileGenerationConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_backoff: Duration::from_millis(self.backoff_ms),
            turn_timeout: Duration::from_secs(self.turn_timeout_secs),
        }
    }
}

/// Context assembly caps (`[context]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContextConfig {
    pub recent_messages: usize,
    pub retrieval_top_k: usize,
    pub max_items: usize,
    pub max_chars: usize,
    pub max_entry_chars: usize,
}

impl Default for FileContextConfig {
    fn default() -> Self {
        let limits = ContextLimits::default();
        let params = ContextParams::default();
        Self {
            recent_messages: params.recent_messages,
            retrieval_top_k: params.retrieval_top_k,
            max_items: limits.max_items,
            max_chars: limits.max_chars,
            max_entry_chars: limits.max_entry_chars,
        }
    }
}

impl FileContextConfig {
    pub fn to_context_params(&self) -> ContextParams {
        ContextParams {
            recent_messages: self.recent_messages,
            retrieval_top_k: self.retrieval_top_k,
            limits: ContextLimits {
                max_items: self.max_items,
                max_chars: self.max_chars,
                max_entry_chars: self.max_entry_chars,
            },
        }
    }
}

/// Journal output (`[journal]` section)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// Where to write the JSONL journal; journaling is off when unset
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_convert_cleanly() {
        let config = FileConfig::default();
        assert_eq!(config.discussion.intensity().unwrap(), Intensity::Normal);

        let orchestrator = config.to_orchestrator_config();
        assert_eq!(orchestrator.retry.max_attempts, 2);
        assert_eq!(orchestrator.context.retrieval_top_k, 5);
        assert!(config.journal.path.is_none());
    }

    #[test]
    fn test_unknown_intensity_fails_fast() {
        let config = FileDiscussionConfig {
            intensity: "blistering".to_string(),
        };
        assert!(config.intensity().is_err());
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let config = FileGenerationConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.to_retry_policy().max_attempts, 1);
    }
}
