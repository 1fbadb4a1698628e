//! Discussion lifecycle state machine

use serde::{Deserialize, Serialize};

/// Lifecycle state of a discussion
///
/// The legal edges:
///
/// ```text
/// Created ──execute──▶ Running ──scheduler done──▶ Completed
///    │                  │  ▲ │
///    │            pause │  │ │ unrecoverable error
///    │                  ▼  │ ▼
///    │                 Paused  Failed
///    │                  │
///    └──────stop────────┴──▶ Stopped   (also legal from Running)
/// ```
///
/// Completed, Stopped, and Failed are terminal and never overridable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionState {
    Created,
    Running,
    Paused,
    Completed,
    Stopped,
    Failed,
}

impl DiscussionState {
    pub fn as_str(&self) -> &str {
        match self {
            DiscussionState::Created => "created",
            DiscussionState::Running => "running",
            DiscussionState::Paused => "paused",
            DiscussionState::Completed => "completed",
            DiscussionState::Stopped => "stopped",
            DiscussionState::Failed => "failed",
        }
    }

    /// Whether the discussion can never leave this state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DiscussionState::Completed | DiscussionState::Stopped | DiscussionState::Failed
        )
    }

    /// Whether the edge `self -> next` is legal
    pub fn can_transition_to(&self, next: DiscussionState) -> bool {
        use DiscussionState::*;
        matches!(
            (self, next),
            (Created, Running)
                | (Paused, Running)
                | (Running, Paused)
                | (Running, Completed)
                | (Running, Failed)
                | (Created, Stopped)
                | (Running, Stopped)
                | (Paused, Stopped)
        )
    }
}

impl std::fmt::Display for DiscussionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DiscussionState::*;

    #[test]
    fn test_legal_edges() {
        assert!(Created.can_transition_to(Running));
        assert!(Running.can_transition_to(Paused));
        assert!(Paused.can_transition_to(Running));
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));
        assert!(Created.can_transition_to(Stopped));
        assert!(Running.can_transition_to(Stopped));
        assert!(Paused.can_transition_to(Stopped));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [Completed, Stopped, Failed] {
            for next in [Created, Running, Paused, Completed, Stopped, Failed] {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_rejected_edges() {
        assert!(!Created.can_transition_to(Paused));
        assert!(!Created.can_transition_to(Completed));
        assert!(!Created.can_transition_to(Failed));
        assert!(!Paused.can_transition_to(Completed));
        assert!(!Paused.can_transition_to(Failed));
        assert!(!Running.can_transition_to(Created));
    }

    #[test]
    fn test_is_terminal() {
        assert!(Completed.is_terminal());
        assert!(Stopped.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Created.is_terminal());
        assert!(!Running.is_terminal());
        assert!(!Paused.is_terminal());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Running).unwrap();
        assert_eq!(json, "\"running\"");
    }
}
