//! Discussion Orchestrator use case.
//!
//! Owns the discussion lifecycle state machine and the turn loop:
//! ask the scheduler who speaks → assemble context → generate → append the
//! turn to the ledger → re-ask the scheduler, until the scheduler signals
//! completion, a pause/stop request is observed, or generation fails for
//! good.
//!
//! Per-discussion execution is serialized by an [`ExecutionGuard`]: at most
//! one active turn loop per discussion id, ever. A concurrent caller that
//! finds the guard held gets the current status back instead of blocking or
//! starting a parallel loop. Pause and stop are requests, not preemption:
//! the loop observes them at the between-turns checkpoint by re-reading the
//! persisted row, so an in-flight turn always settles first.

use crate::config::OrchestratorConfig;
use crate::ports::agent_directory::AgentDirectory;
use crate::ports::completion::CompletionGateway;
use crate::ports::discussion_journal::{DiscussionJournal, JournalEvent, NoJournal};
use crate::ports::discussion_store::{DiscussionStore, StoreError};
use crate::ports::room_directory::{DirectoryError, RoomDirectory};
use crate::ports::semantic_retrieval::SemanticRetrieval;
use crate::use_cases::assemble_context::ContextAssembler;
use crate::use_cases::generate_response::{GenerationError, ResponseGenerator};
use colloquy_domain::{
    AgentId, Discussion, DiscussionId, DiscussionState, DomainError, Intensity, MessageId, RoomId,
    Topic, Turn, TurnDecision, TurnScheduler,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during orchestration
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Discussion not found: {0}")]
    NotFound(DiscussionId),

    #[error("Operation not valid while the discussion is {current}")]
    InvalidState { current: DiscussionState },

    #[error("Turn generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Ledger error: {0}")]
    Store(StoreError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl From<StoreError> for OrchestratorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => OrchestratorError::NotFound(id),
            other => OrchestratorError::Store(other),
        }
    }
}

impl OrchestratorError {
    fn from_domain(e: DomainError) -> Self {
        match e {
            DomainError::InvalidTransition { from, .. } => {
                OrchestratorError::InvalidState { current: from }
            }
            other => OrchestratorError::Validation(other.to_string()),
        }
    }
}

/// Input for creating a discussion
#[derive(Debug, Clone)]
pub struct CreateDiscussionInput {
    pub room_id: RoomId,
    pub origin_message_id: MessageId,
    pub participants: Vec<AgentId>,
    pub topic: Option<Topic>,
    pub intensity: Intensity,
}

impl CreateDiscussionInput {
    pub fn new(
        room_id: impl Into<RoomId>,
        origin_message_id: impl Into<MessageId>,
        participants: Vec<AgentId>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            origin_message_id: origin_message_id.into(),
            participants,
            topic: None,
            intensity: Intensity::default(),
        }
    }

    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }
}

/// Read-only view of a discussion and its recorded turns
#[derive(Debug, Clone, Serialize)]
pub struct DiscussionSnapshot {
    pub discussion: Discussion,
    pub turns: Vec<Turn>,
}

impl DiscussionSnapshot {
    pub fn state(&self) -> DiscussionState {
        self.discussion.state()
    }

    /// Turns occupying the sequence space, in order
    pub fn successful_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_succeeded())
    }
}

/// Outcome of one `execute_discussion` invocation
#[derive(Debug)]
pub struct ExecutionReport {
    /// Latest persisted state after the loop exited
    pub snapshot: DiscussionSnapshot,
    /// Turns produced by this invocation only
    pub produced: Vec<Turn>,
    /// True when another loop already held the guard and no work was done
    pub already_running: bool,
}

/// Per-discussion mutual exclusion.
///
/// One slot per discussion id; the turn loop holds the slot's lock for its
/// whole duration. `try_lock` keeps losing callers from blocking.
#[derive(Default)]
struct ExecutionGuard {
    slots: Mutex<HashMap<DiscussionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ExecutionGuard {
    fn slot(&self, id: &DiscussionId) -> Arc<tokio::sync::Mutex<()>> {
        let mut slots = self.slots.lock().unwrap();
        slots.entry(id.clone()).or_default().clone()
    }
}

/// Use case driving multi-agent debates
///
/// All collaborators are injected at construction and scoped to this
/// instance; tests substitute fakes without touching process state.
pub struct DiscussionOrchestrator<L, R, A, S, G>
where
    L: DiscussionStore,
    R: RoomDirectory,
    A: AgentDirectory,
    S: SemanticRetrieval,
    G: CompletionGateway,
{
    store: Arc<L>,
    rooms: Arc<R>,
    agents: Arc<A>,
    assembler: ContextAssembler<R, S>,
    generator: ResponseGenerator<G>,
    journal: Arc<dyn DiscussionJournal>,
    guards: ExecutionGuard,
    cancellation: Option<CancellationToken>,
}

impl<L, R, A, S, G> DiscussionOrchestrator<L, R, A, S, G>
where
    L: DiscussionStore,
    R: RoomDirectory,
    A: AgentDirectory,
    S: SemanticRetrieval,
    G: CompletionGateway,
{
    pub fn new(
        store: Arc<L>,
        rooms: Arc<R>,
        agents: Arc<A>,
        retrieval: Arc<S>,
        gateway: Arc<G>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            assembler: ContextAssembler::new(rooms.clone(), retrieval, config.context),
            generator: ResponseGenerator::new(gateway, config.retry),
            store,
            rooms,
            agents,
            journal: Arc::new(NoJournal),
            guards: ExecutionGuard::default(),
            cancellation: None,
        }
    }

    /// Set a journal for structured lifecycle events
    pub fn with_journal(mut self, journal: Arc<dyn DiscussionJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Set a cancellation token for graceful process shutdown.
    ///
    /// Cancellation behaves like a pause request: observed between turns,
    /// the in-flight turn settles first.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Create a discussion in the Created state.
    ///
    /// Every validation runs before any state exists anywhere: participant
    /// count and distinctness, room and origin message resolution, and a
    /// profile lookup for each participant.
    pub async fn create_discussion(
        &self,
        input: CreateDiscussionInput,
    ) -> Result<Discussion, OrchestratorError> {
        let discussion = Discussion::new(
            input.room_id,
            input.origin_message_id,
            input.participants,
            input.topic,
            input.intensity,
        )
        .map_err(OrchestratorError::from_domain)?;

        if !self.rooms.room_exists(discussion.room_id()).await? {
            return Err(OrchestratorError::Validation(format!(
                "Unknown room: {}",
                discussion.room_id()
            )));
        }
        if !self
            .rooms
            .message_exists(discussion.room_id(), discussion.origin_message_id())
            .await?
        {
            return Err(OrchestratorError::Validation(format!(
                "Unknown origin message: {}",
                discussion.origin_message_id()
            )));
        }
        for agent in discussion.participants() {
            if self.agents.find_agent(agent).await?.is_none() {
                return Err(OrchestratorError::Validation(format!(
                    "Unknown agent: {agent}"
                )));
            }
        }

        self.store.insert_discussion(&discussion).await?;
        self.journal.record(JournalEvent::new(
            "discussion_created",
            json!({
                "discussion_id": discussion.id().as_str(),
                "room_id": discussion.room_id().as_str(),
                "participants": discussion.participants().iter().map(|a| a.as_str()).collect::<Vec<_>>(),
                "intensity": discussion.intensity().as_str(),
            }),
        ));
        info!(
            "Created discussion {} with {} participants",
            discussion.id(),
            discussion.participants().len()
        );
        Ok(discussion)
    }

    /// Run the turn loop until completion, pause, stop, or failure.
    ///
    /// Idempotent with respect to state: if another loop is already active
    /// for this id, the call reports the current status instead of starting
    /// a second loop. A Running row with a free guard is crash recovery and
    /// resumes from the persisted cursor.
    pub async fn execute_discussion(
        &self,
        id: &DiscussionId,
        requesting_user: &str,
    ) -> Result<ExecutionReport, OrchestratorError> {
        let slot = self.guards.slot(id);
        let _permit = match slot.try_lock_owned() {
            Ok(permit) => permit,
            Err(_) => {
                debug!("Discussion {} already has an active loop", id);
                let snapshot = self.snapshot(id).await?;
                return Ok(ExecutionReport {
                    snapshot,
                    produced: Vec::new(),
                    already_running: true,
                });
            }
        };

        let mut discussion = self.store.load_discussion(id).await?;
        match discussion.state() {
            DiscussionState::Created | DiscussionState::Paused => {
                discussion
                    .transition(DiscussionState::Running)
                    .map_err(OrchestratorError::from_domain)?;
                self.persist_state(&discussion).await?;
                self.journal_state(&discussion);
            }
            DiscussionState::Running => {
                info!(
                    "Resuming discussion {} from cursor {}",
                    id,
                    discussion.turn_cursor()
                );
            }
            current => return Err(OrchestratorError::InvalidState { current }),
        }

        let mut produced = Vec::new();
        let outcome = self
            .turn_loop(&mut discussion, requesting_user, &mut produced)
            .await;

        let snapshot = self.snapshot(id).await?;
        outcome.map(|()| ExecutionReport {
            snapshot,
            produced,
            already_running: false,
        })
    }

    /// Request a pause. Valid only from Running; already Paused is a no-op.
    pub async fn pause_discussion(&self, id: &DiscussionId) -> Result<(), OrchestratorError> {
        let mut discussion = self.store.load_discussion(id).await?;
        match discussion.state() {
            DiscussionState::Paused => Ok(()),
            DiscussionState::Running => {
                discussion
                    .transition(DiscussionState::Paused)
                    .map_err(OrchestratorError::from_domain)?;
                self.persist_state(&discussion).await?;
                self.journal_state(&discussion);
                info!("Pause requested for discussion {}", id);
                Ok(())
            }
            current => Err(OrchestratorError::InvalidState { current }),
        }
    }

    /// Leave Paused without producing turns; the next `execute_discussion`
    /// continues from the current cursor.
    pub async fn resume_discussion(&self, id: &DiscussionId) -> Result<(), OrchestratorError> {
        let mut discussion = self.store.load_discussion(id).await?;
        match discussion.state() {
            DiscussionState::Paused => {
                discussion
                    .transition(DiscussionState::Running)
                    .map_err(OrchestratorError::from_domain)?;
                self.persist_state(&discussion).await?;
                self.journal_state(&discussion);
                Ok(())
            }
            current => Err(OrchestratorError::InvalidState { current }),
        }
    }

    /// Request a stop. Terminal: no further turns, ever. Valid from
    /// Created/Running/Paused; already Stopped is a no-op; Completed and
    /// Failed are not overridable.
    pub async fn stop_discussion(&self, id: &DiscussionId) -> Result<(), OrchestratorError> {
        let mut discussion = self.store.load_discussion(id).await?;
        match discussion.state() {
            DiscussionState::Stopped => Ok(()),
            DiscussionState::Created | DiscussionState::Running | DiscussionState::Paused => {
                discussion
                    .transition(DiscussionState::Stopped)
                    .map_err(OrchestratorError::from_domain)?;
                self.persist_state(&discussion).await?;
                self.journal_state(&discussion);
                info!("Stop requested for discussion {}", id);
                Ok(())
            }
            current => Err(OrchestratorError::InvalidState { current }),
        }
    }

    /// Latest persisted state plus the ordered turn list
    pub async fn discussion_status(
        &self,
        id: &DiscussionId,
    ) -> Result<DiscussionSnapshot, OrchestratorError> {
        self.snapshot(id).await
    }

    // =========================================================================
    // Turn loop
    // =========================================================================

    async fn turn_loop(
        &self,
        discussion: &mut Discussion,
        requesting_user: &str,
        produced: &mut Vec<Turn>,
    ) -> Result<(), OrchestratorError> {
        let id = discussion.id().clone();

        loop {
            // Between-turns checkpoint: observe pause/stop requests persisted
            // by other callers since the last turn settled.
            *discussion = self.store.load_discussion(&id).await?;
            match discussion.state() {
                DiscussionState::Running => {}
                DiscussionState::Paused | DiscussionState::Stopped => {
                    info!(
                        "Discussion {} loop exiting: state is {}",
                        id,
                        discussion.state()
                    );
                    return Ok(());
                }
                current => return Err(OrchestratorError::InvalidState { current }),
            }

            if let Some(token) = &self.cancellation
                && token.is_cancelled()
            {
                info!("Shutdown requested, pausing discussion {}", id);
                discussion
                    .transition(DiscussionState::Paused)
                    .map_err(OrchestratorError::from_domain)?;
                self.persist_state(discussion).await?;
                self.journal_state(discussion);
                return Ok(());
            }

            let decision = TurnScheduler::decide(
                discussion.participants(),
                discussion.turn_cursor(),
                discussion.intensity(),
            );

            let agent_id = match decision {
                TurnDecision::Complete => {
                    discussion
                        .transition(DiscussionState::Completed)
                        .map_err(OrchestratorError::from_domain)?;
                    self.persist_state(discussion).await?;
                    self.journal_state(discussion);
                    info!(
                        "Discussion {} completed after {} turns",
                        id,
                        discussion.turn_cursor()
                    );
                    return Ok(());
                }
                TurnDecision::Speak(agent_id) => agent_id,
            };

            self.take_turn(discussion, agent_id, requesting_user, produced)
                .await?;
        }
    }

    /// One settled turn: context → generation → atomic append, or a recorded
    /// failure that ends the discussion.
    async fn take_turn(
        &self,
        discussion: &mut Discussion,
        agent_id: AgentId,
        requesting_user: &str,
        produced: &mut Vec<Turn>,
    ) -> Result<(), OrchestratorError> {
        let sequence = discussion.turn_cursor();
        let profile = self
            .agents
            .find_agent(&agent_id)
            .await?
            .ok_or_else(|| OrchestratorError::Validation(format!("Unknown agent: {agent_id}")))?;

        let history = self.store.list_turns(discussion.id()).await?;
        let context = self
            .assembler
            .assemble(discussion.room_id(), discussion.topic(), &history)
            .await;

        debug!(
            "Discussion {} turn {}: {} speaks",
            discussion.id(),
            sequence,
            agent_id
        );

        match self
            .generator
            .generate(&profile, discussion.topic(), &context, Some(requesting_user))
            .await
        {
            Ok(text) => {
                let turn = Turn::succeeded(discussion.id().clone(), sequence, agent_id, text);
                self.store.append_turn(&turn).await?;
                discussion.advance_cursor();
                self.journal.record(JournalEvent::new(
                    "turn_recorded",
                    json!({
                        "discussion_id": turn.discussion_id.as_str(),
                        "sequence": turn.sequence,
                        "agent_id": turn.agent_id.as_str(),
                    }),
                ));
                produced.push(turn);
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Discussion {} failing: turn {} by {} did not settle: {}",
                    discussion.id(),
                    sequence,
                    agent_id,
                    e
                );
                let turn =
                    Turn::failed_attempt(discussion.id().clone(), sequence, agent_id, e.to_string());
                self.store.record_failed_attempt(&turn).await?;
                discussion
                    .fail(e.to_string())
                    .map_err(OrchestratorError::from_domain)?;
                self.persist_state(discussion).await?;
                self.journal.record(JournalEvent::new(
                    "turn_failed",
                    json!({
                        "discussion_id": turn.discussion_id.as_str(),
                        "sequence": turn.sequence,
                        "agent_id": turn.agent_id.as_str(),
                        "error": turn.error,
                    }),
                ));
                self.journal_state(discussion);
                produced.push(turn);
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn snapshot(&self, id: &DiscussionId) -> Result<DiscussionSnapshot, OrchestratorError> {
        let discussion = self.store.load_discussion(id).await?;
        let turns = self.store.list_turns(id).await?;
        Ok(DiscussionSnapshot { discussion, turns })
    }

    async fn persist_state(&self, discussion: &Discussion) -> Result<(), OrchestratorError> {
        self.store
            .save_state(
                discussion.id(),
                discussion.state(),
                discussion.turn_cursor(),
                discussion.failure_reason(),
            )
            .await?;
        Ok(())
    }

    fn journal_state(&self, discussion: &Discussion) {
        self.journal.record(JournalEvent::new(
            "state_changed",
            json!({
                "discussion_id": discussion.id().as_str(),
                "state": discussion.state().as_str(),
                "turn_cursor": discussion.turn_cursor(),
            }),
        ));
    }
}
