//! Assemble Context use case.
//!
//! Gathers the grounding for one turn: chronological room messages, the
//! discussion's own prior turns, and a bounded number of semantically
//! relevant historical snippets. Retrieval is best-effort: any failure
//! degrades to chronological-only context and is never fatal to a turn.

use crate::config::ContextParams;
use crate::ports::room_directory::RoomDirectory;
use crate::ports::semantic_retrieval::SemanticRetrieval;
use colloquy_domain::{ContextBundle, ContextSnippet, RoomId, Topic, Turn};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case for building a turn's [`ContextBundle`]
pub struct ContextAssembler<R: RoomDirectory, S: SemanticRetrieval> {
    rooms: Arc<R>,
    retrieval: Arc<S>,
    params: ContextParams,
}

impl<R: RoomDirectory, S: SemanticRetrieval> ContextAssembler<R, S> {
    pub fn new(rooms: Arc<R>, retrieval: Arc<S>, params: ContextParams) -> Self {
        Self {
            rooms,
            retrieval,
            params,
        }
    }

    /// Build the bundle for the next turn of a discussion.
    ///
    /// Ordering inside the bundle: retrieved background first, then room
    /// messages, then the debate turns so far, oldest to newest, ending at
    /// the words the next speaker is replying to.
    pub async fn assemble(
        &self,
        room_id: &RoomId,
        topic: Option<&Topic>,
        turn_history: &[Turn],
    ) -> ContextBundle {
        let mut bundle = ContextBundle::new(self.params.limits);

        for snippet in self.retrieve(room_id, topic, turn_history).await {
            if !bundle.push(snippet) {
                break;
            }
        }

        match self
            .rooms
            .recent_messages(room_id, self.params.recent_messages)
            .await
        {
            Ok(messages) => {
                for message in messages {
                    if !bundle.push(ContextSnippet::message(message.author, message.content)) {
                        break;
                    }
                }
            }
            Err(e) => {
                warn!("Room history unavailable, continuing without it: {}", e);
            }
        }

        for turn in turn_history.iter().filter(|t| t.is_succeeded()) {
            if !bundle.push(ContextSnippet::turn(
                turn.agent_id.to_string(),
                turn.content.clone(),
            )) {
                break;
            }
        }

        debug!("Assembled context bundle with {} items", bundle.len());
        bundle
    }

    /// Semantic retrieval keyed by the topic and the latest turn.
    ///
    /// Returns an empty vec on any failure. Degraded, never fatal.
    async fn retrieve(
        &self,
        room_id: &RoomId,
        topic: Option<&Topic>,
        turn_history: &[Turn],
    ) -> Vec<ContextSnippet> {
        let query = Self::build_query(topic, turn_history);
        if query.is_empty() {
            return Vec::new();
        }

        match self
            .retrieval
            .semantic_query(room_id, &query, self.params.retrieval_top_k)
            .await
        {
            Ok(snippets) => snippets
                .into_iter()
                .map(|s| ContextSnippet::retrieved(s.source, s.content, s.score))
                .collect(),
            Err(e) => {
                warn!("Semantic retrieval failed, degrading to chronological context: {}", e);
                Vec::new()
            }
        }
    }

    fn build_query(topic: Option<&Topic>, turn_history: &[Turn]) -> String {
        let mut parts = Vec::new();
        if let Some(topic) = topic {
            parts.push(topic.content().to_string());
        }
        if let Some(last) = turn_history.iter().rev().find(|t| t.is_succeeded()) {
            parts.push(last.content.clone());
        }
        parts.join("\n")
    }
}
