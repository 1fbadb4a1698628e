//! Lexical retrieval over an in-process corpus.
//!
//! Stands in for a vector store: ranks indexed snippets by token overlap
//! with the query. Scores are normalized by snippet length so short,
//! on-topic snippets beat long rambling ones. Good enough for demos and
//! tests; the port contract (ranked, best-effort) is what matters.

use async_trait::async_trait;
use colloquy_application::ports::semantic_retrieval::{
    RetrievalError, ScoredSnippet, SemanticRetrieval,
};
use colloquy_domain::RoomId;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

struct IndexedSnippet {
    source: String,
    content: String,
    tokens: HashSet<String>,
}

/// Token-overlap retriever, one corpus per room
#[derive(Default)]
pub struct LexicalRetriever {
    corpora: Mutex<HashMap<RoomId, Vec<IndexedSnippet>>>,
}

impl LexicalRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a snippet under a room
    pub fn index(
        &self,
        room: impl Into<RoomId>,
        source: impl Into<String>,
        content: impl Into<String>,
    ) {
        let content = content.into();
        let tokens = tokenize(&content);
        self.corpora
            .lock()
            .unwrap()
            .entry(room.into())
            .or_default()
            .push(IndexedSnippet {
                source: source.into(),
                content,
                tokens,
            });
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl SemanticRetrieval for LexicalRetriever {
    async fn semantic_query(
        &self,
        room: &RoomId,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredSnippet>, RetrievalError> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let corpora = self.corpora.lock().unwrap();
        let Some(snippets) = corpora.get(room) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredSnippet> = snippets
            .iter()
            .filter_map(|snippet| {
                let overlap = snippet.tokens.intersection(&query_tokens).count();
                if overlap == 0 {
                    return None;
                }
                let score = overlap as f32 / (snippet.tokens.len().max(1) as f32).sqrt();
                Some(ScoredSnippet {
                    source: snippet.source.clone(),
                    content: snippet.content.clone(),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}
