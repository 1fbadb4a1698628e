//! Context bundle for grounding a generation call.
//!
//! [`ContextBundle`] caps both item count and total character volume so a
//! long room history can never push the topic and turn instruction out of
//! the model's effective attention window. Oversized single snippets are
//! truncated rather than dropped.

use crate::core::string::truncate_str;
use serde::{Deserialize, Serialize};

/// Where a context snippet came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    /// Chronological room message
    Message,
    /// Prior turn of this discussion
    Turn,
    /// Semantically retrieved historical snippet
    Retrieved,
}

/// One piece of grounding context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub kind: SnippetKind,
    /// Who said it (agent display name, message author, or retrieval source)
    pub speaker: String,
    pub content: String,
    /// Relevance score for retrieved snippets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl ContextSnippet {
    pub fn message(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: SnippetKind::Message,
            speaker: speaker.into(),
            content: content.into(),
            score: None,
        }
    }

    pub fn turn(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: SnippetKind::Turn,
            speaker: speaker.into(),
            content: content.into(),
            score: None,
        }
    }

    pub fn retrieved(source: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            kind: SnippetKind::Retrieved,
            speaker: source.into(),
            content: content.into(),
            score: Some(score),
        }
    }
}

/// Budget knobs for a bundle
///
/// - `max_items`: hard cap on snippet count
/// - `max_chars`: total character budget across all snippet contents
/// - `max_entry_chars`: a single snippet is truncated to this before counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLimits {
    pub max_items: usize,
    pub max_chars: usize,
    pub max_entry_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_items: 24,
            max_chars: 12_000,
            max_entry_chars: 1_500,
        }
    }
}

/// Bounded, ordered collection of context snippets (Value Object)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBundle {
    limits: ContextLimits,
    items: Vec<ContextSnippet>,
    used_chars: usize,
}

impl ContextBundle {
    pub fn new(limits: ContextLimits) -> Self {
        Self {
            limits,
            items: Vec::new(),
            used_chars: 0,
        }
    }

    /// Try to add a snippet, truncating its content to the per-entry cap.
    ///
    /// Returns `false` (and drops the snippet) once either the item cap or
    /// the character budget is exhausted.
    pub fn push(&mut self, mut snippet: ContextSnippet) -> bool {
        if self.items.len() >= self.limits.max_items {
            return false;
        }
        let kept = truncate_str(&snippet.content, self.limits.max_entry_chars).len();
        if self.used_chars + kept > self.limits.max_chars {
            return false;
        }
        snippet.content.truncate(kept);
        self.used_chars += kept;
        self.items.push(snippet);
        true
    }

    pub fn items(&self) -> &[ContextSnippet] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Render the bundle as a prompt section
    pub fn render(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let label = match item.kind {
                SnippetKind::Message => "message",
                SnippetKind::Turn => "turn",
                SnippetKind::Retrieved => "recalled",
            };
            out.push_str(&format!("[{}] {}: {}\n", label, item.speaker, item.content));
        }
        out
    }
}
