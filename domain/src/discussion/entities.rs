//! Discussion and Turn entities

use crate::core::error::DomainError;
use crate::core::ids::{AgentId, DiscussionId, MessageId, RoomId};
use crate::core::topic::Topic;
use crate::discussion::intensity::Intensity;
use crate::discussion::state::DiscussionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum number of distinct participants for a debate
pub const MIN_PARTICIPANTS: usize = 2;

/// The unit of orchestration (Entity)
///
/// Everything except `state`, `turn_cursor`, `failure_reason`, and
/// `updated_at` is immutable after creation. Participant order is fixed at
/// creation and seeds the round-robin schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    id: DiscussionId,
    room_id: RoomId,
    origin_message_id: MessageId,
    topic: Option<Topic>,
    intensity: Intensity,
    participants: Vec<AgentId>,
    state: DiscussionState,
    turn_cursor: u32,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Discussion {
    /// Create a new discussion in the Created state with a fresh id
    ///
    /// Rejects fewer than [`MIN_PARTICIPANTS`] entries and duplicate agent
    /// ids before any state exists anywhere.
    pub fn new(
        room_id: impl Into<RoomId>,
        origin_message_id: impl Into<MessageId>,
        participants: Vec<AgentId>,
        topic: Option<Topic>,
        intensity: Intensity,
    ) -> Result<Self, DomainError> {
        if participants.len() < MIN_PARTICIPANTS {
            return Err(DomainError::NotEnoughParticipants {
                minimum: MIN_PARTICIPANTS,
                actual: participants.len(),
            });
        }
        let mut seen = HashSet::new();
        for agent in &participants {
            if !seen.insert(agent) {
                return Err(DomainError::DuplicateParticipant(agent.clone()));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: DiscussionId::generate(),
            room_id: room_id.into(),
            origin_message_id: origin_message_id.into(),
            topic,
            intensity,
            participants,
            state: DiscussionState::Created,
            turn_cursor: 0,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &DiscussionId {
        &self.id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn origin_message_id(&self) -> &MessageId {
        &self.origin_message_id
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn participants(&self) -> &[AgentId] {
        &self.participants
    }

    pub fn state(&self) -> DiscussionState {
        self.state
    }

    /// Index of the next scheduling decision
    pub fn turn_cursor(&self) -> u32 {
        self.turn_cursor
    }

    /// Why the discussion entered Failed, if it did
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Move along one edge of the lifecycle machine
    ///
    /// Illegal edges (including any exit from a terminal state) are rejected
    /// without mutating the entity.
    pub fn transition(&mut self, next: DiscussionState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition to Failed and record the reason
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.transition(DiscussionState::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Advance the cursor after a turn reached SUCCEEDED
    pub fn advance_cursor(&mut self) {
        self.turn_cursor += 1;
        self.updated_at = Utc::now();
    }

    /// Apply an externally persisted state snapshot, bypassing edge checks.
    ///
    /// Ledger adapters use this when writing back a row the orchestrator
    /// already validated; it is not part of the lifecycle API.
    pub fn sync_execution_state(
        &mut self,
        state: DiscussionState,
        turn_cursor: u32,
        failure_reason: Option<String>,
    ) {
        self.state = state;
        self.turn_cursor = turn_cursor;
        if failure_reason.is_some() {
            self.failure_reason = failure_reason;
        }
        self.updated_at = Utc::now();
    }
}

/// Outcome of one generation attempt for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    Pending,
    Succeeded,
    Failed,
}

/// One agent's contribution (Entity)
///
/// Identity is `(discussion_id, sequence)`. Only SUCCEEDED turns occupy the
/// sequence space; a failed final attempt is recorded with the sequence it
/// was aiming for but never advances the cursor, so the SUCCEEDED sequences
/// of a discussion always form the gapless prefix 0..m.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub discussion_id: DiscussionId,
    pub sequence: u32,
    pub agent_id: AgentId,
    pub content: String,
    pub status: TurnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// A settled, successful turn
    pub fn succeeded(
        discussion_id: DiscussionId,
        sequence: u32,
        agent_id: AgentId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            discussion_id,
            sequence,
            agent_id,
            content: content.into(),
            status: TurnStatus::Succeeded,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// A settled attempt that failed after all retries
    pub fn failed_attempt(
        discussion_id: DiscussionId,
        sequence: u32,
        agent_id: AgentId,
        error: impl Into<String>,
    ) -> Self {
        Self {
            discussion_id,
            sequence,
            agent_id,
            content: String::new(),
            status: TurnStatus::Failed,
            error: Some(error.into()),
            created_at: Utc::now(),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == TurnStatus::Succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(ids: &[&str]) -> Vec<AgentId> {
        ids.iter().map(|s| AgentId::from(*s)).collect()
    }

    fn discussion() -> Discussion {
        Discussion::new(
            "room-1",
            "msg-1",
            agents(&["a", "b"]),
            Some(Topic::new("test topic").unwrap()),
            Intensity::Normal,
        )
        .unwrap()
    }

    #[test]
    fn test_new_discussion_starts_created_with_zero_cursor() {
        let d = discussion();
        assert_eq!(d.state(), DiscussionState::Created);
        assert_eq!(d.turn_cursor(), 0);
        assert!(d.failure_reason().is_none());
    }

    #[test]
    fn test_single_participant_rejected() {
        let err = Discussion::new("r", "m", agents(&["solo"]), None, Intensity::Low).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotEnoughParticipants {
                minimum: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let err =
            Discussion::new("r", "m", agents(&["a", "b", "a"]), None, Intensity::Low).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateParticipant(id) if id.as_str() == "a"));
    }

    #[test]
    fn test_transition_walks_lifecycle() {
        let mut d = discussion();
        d.transition(DiscussionState::Running).unwrap();
        d.transition(DiscussionState::Paused).unwrap();
        d.transition(DiscussionState::Running).unwrap();
        d.transition(DiscussionState::Completed).unwrap();
        assert_eq!(d.state(), DiscussionState::Completed);
    }

    #[test]
    fn test_illegal_transition_leaves_state_untouched() {
        let mut d = discussion();
        let err = d.transition(DiscussionState::Completed).unwrap_err();
        assert!(err.is_invalid_transition());
        assert_eq!(d.state(), DiscussionState::Created);
    }

    #[test]
    fn test_terminal_state_cannot_be_revived() {
        let mut d = discussion();
        d.transition(DiscussionState::Stopped).unwrap();
        assert!(d.transition(DiscussionState::Running).is_err());
    }

    #[test]
    fn test_fail_records_reason() {
        let mut d = discussion();
        d.transition(DiscussionState::Running).unwrap();
        d.fail("generation blew up").unwrap();
        assert_eq!(d.state(), DiscussionState::Failed);
        assert_eq!(d.failure_reason(), Some("generation blew up"));
    }

    #[test]
    fn test_fail_from_created_rejected() {
        let mut d = discussion();
        assert!(d.fail("too early").is_err());
        assert!(d.failure_reason().is_none());
    }

    #[test]
    fn test_advance_cursor() {
        let mut d = discussion();
        d.advance_cursor();
        d.advance_cursor();
        assert_eq!(d.turn_cursor(), 2);
    }

    #[test]
    fn test_turn_constructors() {
        let d = discussion();
        let ok = Turn::succeeded(d.id().clone(), 0, AgentId::from("a"), "hello");
        assert!(ok.is_succeeded());
        assert_eq!(ok.error, None);

        let bad = Turn::failed_attempt(d.id().clone(), 1, AgentId::from("b"), "timeout");
        assert!(!bad.is_succeeded());
        assert_eq!(bad.status, TurnStatus::Failed);
        assert_eq!(bad.error.as_deref(), Some("timeout"));
        assert!(bad.content.is_empty());
    }
}
