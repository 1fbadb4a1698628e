//! Semantic retrieval port
//!
//! Best-effort access to semantically relevant historical content. Failures
//! here must never fail a turn; the context assembler degrades to
//! chronological-only context.

use async_trait::async_trait;
use colloquy_domain::RoomId;
use thiserror::Error;

/// Errors from the retrieval collaborator
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Retrieval backend unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// A retrieved snippet with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredSnippet {
    /// Where the snippet came from (message id, document name, ...)
    pub source: String,
    pub content: String,
    pub score: f32,
}

/// Ranked semantic search over a room's history
#[async_trait]
pub trait SemanticRetrieval: Send + Sync {
    /// The `top_k` most relevant snippets for `query`, best first
    async fn semantic_query(
        &self,
        room: &RoomId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredSnippet>, RetrievalError>;
}
