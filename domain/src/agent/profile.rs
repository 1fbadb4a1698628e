//! Agent profile entity

use crate::core::ids::AgentId;
use serde::{Deserialize, Serialize};

/// A participating agent's persona (Entity)
///
/// Authored outside this system; the orchestrator only reads profiles to
/// build generation prompts. `style_tag` is an optional short label the
/// generation collaborator may use to pick a voice ("formal", "playful", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    id: AgentId,
    display_name: String,
    persona: String,
    style_tag: Option<String>,
}

impl AgentProfile {
    pub fn new(
        id: impl Into<AgentId>,
        display_name: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            persona: persona.into(),
            style_tag: None,
        }
    }

    pub fn with_style_tag(mut self, tag: impl Into<String>) -> Self {
        self.style_tag = Some(tag.into());
        self
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn style_tag(&self) -> Option<&str> {
        self.style_tag.as_deref()
    }
}
