//! In-memory execution ledger.
//!
//! Per-discussion rows behind one mutex, which trivially gives the atomic
//! "append turn + advance cursor" contract: both happen under the same lock
//! acquisition, so no reader ever observes one without the other.

use async_trait::async_trait;
use colloquy_application::ports::discussion_store::{DiscussionStore, StoreError};
use colloquy_domain::{Discussion, DiscussionId, DiscussionState, Turn};
use std::collections::HashMap;
use std::sync::Mutex;

struct Row {
    discussion: Discussion,
    turns: Vec<Turn>,
}

/// Ledger adapter keeping everything in process memory.
///
/// Suitable for tests, demos, and single-process deployments; a database
/// adapter would satisfy the same contract with row-level transactions.
#[derive(Default)]
pub struct InMemoryDiscussionStore {
    rows: Mutex<HashMap<DiscussionId, Row>>,
}

impl InMemoryDiscussionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscussionStore for InMemoryDiscussionStore {
    async fn insert_discussion(&self, discussion: &Discussion) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(discussion.id()) {
            return Err(StoreError::AlreadyExists(discussion.id().clone()));
        }
        rows.insert(
            discussion.id().clone(),
            Row {
                discussion: discussion.clone(),
                turns: Vec::new(),
            },
        );
        Ok(())
    }

    async fn load_discussion(&self, id: &DiscussionId) -> Result<Discussion, StoreError> {
        self.rows
            .lock()
            .unwrap()
            .get(id)
            .map(|row| row.discussion.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn save_state(
        &self,
        id: &DiscussionId,
        state: DiscussionState,
        turn_cursor: u32,
        failure_reason: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        row.discussion
            .sync_execution_state(state, turn_cursor, failure_reason.map(str::to_string));
        Ok(())
    }

    async fn append_turn(&self, turn: &Turn) -> Result<(), StoreError> {
        if !turn.is_succeeded() {
            return Err(StoreError::NotSettled);
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&turn.discussion_id)
            .ok_or_else(|| StoreError::NotFound(turn.discussion_id.clone()))?;
        if turn.sequence != row.discussion.turn_cursor() {
            return Err(StoreError::SequenceConflict {
                discussion_id: turn.discussion_id.clone(),
                sequence: turn.sequence,
                expected: row.discussion.turn_cursor(),
            });
        }
        row.turns.push(turn.clone());
        row.discussion.advance_cursor();
        Ok(())
    }

    async fn record_failed_attempt(&self, turn: &Turn) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&turn.discussion_id)
            .ok_or_else(|| StoreError::NotFound(turn.discussion_id.clone()))?;
        row.turns.push(turn.clone());
        Ok(())
    }

    async fn list_turns(&self, id: &DiscussionId) -> Result<Vec<Turn>, StoreError> {
        self.rows
            .lock()
            .unwrap()
            .get(id)
            .map(|row| row.turns.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::{AgentId, Intensity};

    fn agents(ids: &[&str]) -> Vec<AgentId> {
        ids.iter().map(|s| AgentId::from(*s)).collect()
    }

    fn discussion() -> Discussion {
        Discussion::new("r1", "m1", agents(&["a", "b"]), None, Intensity::Low).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_load_roundtrip() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();

        let loaded = store.load_discussion(d.id()).await.unwrap();
        assert_eq!(loaded.id(), d.id());
        assert_eq!(loaded.state(), DiscussionState::Created);
    }

    #[tokio::test]
    async fn test_double_insert_rejected() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();
        let err = store.insert_discussion(&d).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = InMemoryDiscussionStore::new();
        let ghost = DiscussionId::from("ghost");
        assert!(matches!(
            store.load_discussion(&ghost).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.list_turns(&ghost).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_append_advances_cursor_atomically() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();

        let turn = Turn::succeeded(d.id().clone(), 0, AgentId::from("a"), "first");
        store.append_turn(&turn).await.unwrap();

        let loaded = store.load_discussion(d.id()).await.unwrap();
        assert_eq!(loaded.turn_cursor(), 1);
        assert_eq!(store.list_turns(d.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_out_of_sequence_conflicts() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();

        // Skipping ahead
        let turn = Turn::succeeded(d.id().clone(), 1, AgentId::from("a"), "early");
        let err = store.append_turn(&turn).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::SequenceConflict {
                sequence: 1,
                expected: 0,
                ..
            }
        ));

        // Double-writing the same sequence
        let turn = Turn::succeeded(d.id().clone(), 0, AgentId::from("a"), "first");
        store.append_turn(&turn).await.unwrap();
        let err = store.append_turn(&turn).await.unwrap_err();
        assert!(matches!(err, StoreError::SequenceConflict { .. }));
    }

    #[tokio::test]
    async fn test_unsettled_turn_rejected() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();

        let turn = Turn::failed_attempt(d.id().clone(), 0, AgentId::from("a"), "boom");
        let err = store.append_turn(&turn).await.unwrap_err();
        assert!(matches!(err, StoreError::NotSettled));
    }

    #[tokio::test]
    async fn test_failed_attempt_never_advances_cursor() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();

        let turn = Turn::failed_attempt(d.id().clone(), 0, AgentId::from("a"), "boom");
        store.record_failed_attempt(&turn).await.unwrap();

        let loaded = store.load_discussion(d.id()).await.unwrap();
        assert_eq!(loaded.turn_cursor(), 0);
        assert_eq!(store.list_turns(d.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_state_persists_reason() {
        let store = InMemoryDiscussionStore::new();
        let d = discussion();
        store.insert_discussion(&d).await.unwrap();

        store
            .save_state(d.id(), DiscussionState::Failed, 0, Some("model offline"))
            .await
            .unwrap();

        let loaded = store.load_discussion(d.id()).await.unwrap();
        assert_eq!(loaded.state(), DiscussionState::Failed);
        assert_eq!(loaded.failure_reason(), Some("model offline"));
    }
}
