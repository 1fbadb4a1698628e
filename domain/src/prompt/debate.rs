//! Prompt templates for debate turns

use crate::agent::profile::AgentProfile;
use crate::context::bundle::ContextBundle;

/// Templates for generating the prompts of a debate turn
pub struct DebatePrompt;

impl DebatePrompt {
    /// System prompt establishing the agent's persona and voice
    pub fn system(profile: &AgentProfile) -> String {
        let mut prompt = format!(
            r#"You are {}, one voice in a multi-party debate inside a shared room.

Your persona: {}

Stay in character. Engage directly with what the other participants said,
take a clear position, and keep each contribution focused - one or two
paragraphs at most. Do not summarize the whole debate or speak for others."#,
            profile.display_name(),
            profile.persona()
        );

        if let Some(tag) = profile.style_tag() {
            prompt.push_str(&format!("\n\nWrite in a {} register.", tag));
        }

        prompt
    }

    /// User prompt for one turn: topic framing + grounding context
    pub fn turn(topic: Option<&str>, context: &ContextBundle) -> String {
        let mut prompt = String::new();

        match topic {
            Some(topic) => {
                prompt.push_str(&format!("The debate topic is: {}\n\n", topic));
            }
            None => {
                prompt.push_str("Continue the ongoing debate in this room.\n\n");
            }
        }

        if !context.is_empty() {
            prompt.push_str("Conversation so far and relevant background:\n\n");
            prompt.push_str(&context.render());
            prompt.push('\n');
        }

        prompt.push_str("It is your turn to speak. Respond now, in character.");
        prompt
    }
}
