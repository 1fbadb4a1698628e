//! Offline persona-flavored completion stub.
//!
//! Produces deterministic, visibly distinct text per agent so the demo
//! binary can run a full debate with no model behind it. Each reply quotes
//! a fragment of what it is responding to, which makes the turn-by-turn
//! threading visible in the transcript.

use async_trait::async_trait;
use colloquy_application::ports::completion::{
    CompletionError, CompletionGateway, CompletionRequest,
};
use colloquy_domain::core::string::truncate_str;

/// Stances cycled per call so consecutive turns do not read identically
const STANCES: [&str; 4] = [
    "I'll open with this",
    "Pushing back on that",
    "Building on the last point",
    "To bring this together",
];

/// Deterministic local gateway for demos
#[derive(Default)]
pub struct PersonaStubGateway {
    calls: std::sync::Mutex<usize>,
}

impl PersonaStubGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompletionGateway for PersonaStubGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        let stance = STANCES[(call - 1) % STANCES.len()];
        let last_line = request
            .prompt
            .lines()
            .rev()
            .find(|l| l.starts_with("[turn]") || l.starts_with("[message]"))
            .map(|l| truncate_str(l, 60));

        let reply = match last_line {
            Some(line) => format!(
                "{}: as {} I take issue with \"{}...\" - my read is different, \
                 and round {} is where that difference matters.",
                stance, request.agent_id, line, call
            ),
            None => format!(
                "{}: speaking as {}, here is my opening position on the matter at hand (round {}).",
                stance, request.agent_id, call
            ),
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_domain::AgentId;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "sys".into(),
            prompt: prompt.into(),
            agent_id: AgentId::from("aurora"),
            requesting_user: None,
        }
    }

    #[tokio::test]
    async fn test_replies_are_nonempty_and_mention_agent() {
        let gateway = PersonaStubGateway::new();
        let text = gateway.complete(&request("no context")).await.unwrap();
        assert!(!text.trim().is_empty());
        assert!(text.contains("aurora"));
    }

    #[tokio::test]
    async fn test_quotes_latest_context_line() {
        let gateway = PersonaStubGateway::new();
        let prompt = "The debate topic is: x\n\n[turn] Basalt: that will never scale\n\nRespond.";
        let text = gateway.complete(&request(prompt)).await.unwrap();
        assert!(text.contains("that will never scale"));
    }

    #[tokio::test]
    async fn test_consecutive_calls_differ() {
        let gateway = PersonaStubGateway::new();
        let a = gateway.complete(&request("no context")).await.unwrap();
        let b = gateway.complete(&request("no context")).await.unwrap();
        assert_ne!(a, b);
    }
}
