//! Domain error types

use crate::core::ids::AgentId;
use crate::discussion::state::DiscussionState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("A discussion needs at least {minimum} distinct participants, got {actual}")]
    NotEnoughParticipants { minimum: usize, actual: usize },

    #[error("Participant {0} is listed more than once")]
    DuplicateParticipant(AgentId),

    #[error("Unknown intensity: {0}")]
    UnknownIntensity(String),

    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Cannot transition a discussion from {from} to {to}")]
    InvalidTransition {
        from: DiscussionState,
        to: DiscussionState,
    },
}

impl DomainError {
    /// Check whether this error came from a rejected state transition
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let error = DomainError::InvalidTransition {
            from: DiscussionState::Completed,
            to: DiscussionState::Running,
        };
        assert_eq!(
            error.to_string(),
            "Cannot transition a discussion from completed to running"
        );
    }

    #[test]
    fn test_is_invalid_transition_check() {
        let error = DomainError::InvalidTransition {
            from: DiscussionState::Stopped,
            to: DiscussionState::Running,
        };
        assert!(error.is_invalid_transition());
        assert!(!DomainError::EmptyTopic.is_invalid_transition());
    }
}
