//! Execution ledger port
//!
//! The ledger is the single source of truth for a discussion's lifecycle
//! state and its ordered turn list. The one non-negotiable contract point
//! is atomicity of [`DiscussionStore::append_turn`]: appending a SUCCEEDED
//! turn and advancing the cursor happen as one unit, so no reader ever
//! observes a turn without the advanced cursor or vice versa.

use async_trait::async_trait;
use colloquy_domain::{Discussion, DiscussionId, DiscussionState, Turn};
use thiserror::Error;

/// Errors from ledger operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Discussion not found: {0}")]
    NotFound(DiscussionId),

    #[error("Discussion already exists: {0}")]
    AlreadyExists(DiscussionId),

    #[error("Turn {sequence} conflicts with cursor {expected} for discussion {discussion_id}")]
    SequenceConflict {
        discussion_id: DiscussionId,
        sequence: u32,
        expected: u32,
    },

    #[error("Turn must be SUCCEEDED to occupy a sequence number")]
    NotSettled,

    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Durable record of discussions and their turns
///
/// All operations are atomic per discussion; no cross-discussion
/// transactions are required of an implementation.
#[async_trait]
pub trait DiscussionStore: Send + Sync {
    /// Persist a freshly created discussion row
    async fn insert_discussion(&self, discussion: &Discussion) -> Result<(), StoreError>;

    /// Load the current row, `NotFound` when the id is unknown
    async fn load_discussion(&self, id: &DiscussionId) -> Result<Discussion, StoreError>;

    /// Persist a state transition (and cursor / failure reason) decided by
    /// the orchestrator
    async fn save_state(
        &self,
        id: &DiscussionId,
        state: DiscussionState,
        turn_cursor: u32,
        failure_reason: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Atomically append a SUCCEEDED turn and advance the cursor.
    ///
    /// The turn's `sequence` must equal the discussion's current cursor;
    /// anything else is a [`StoreError::SequenceConflict`], which is what
    /// makes double-writes structurally impossible under concurrent callers.
    async fn append_turn(&self, turn: &Turn) -> Result<(), StoreError>;

    /// Record a FAILED final attempt without touching the cursor.
    ///
    /// Failed attempts are kept for audit but never occupy the sequence
    /// space the scheduler sees.
    async fn record_failed_attempt(&self, turn: &Turn) -> Result<(), StoreError>;

    /// All recorded turns (succeeded and failed attempts) in order
    async fn list_turns(&self, id: &DiscussionId) -> Result<Vec<Turn>, StoreError>;
}
