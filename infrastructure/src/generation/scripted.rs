//! Scripted completion gateway.
//!
//! Pops pre-arranged results, one per call, in order. Lets demos and
//! integration tests drive the orchestrator through exact success/failure
//! sequences without a live model.

use async_trait::async_trait;
use colloquy_application::ports::completion::{
    CompletionError, CompletionGateway, CompletionRequest,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Gateway returning scripted results in order
pub struct ScriptedCompletionGateway {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
}

impl ScriptedCompletionGateway {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
        }
    }

    /// Remaining scripted results
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedCompletionGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Failed("script exhausted".to_string())))
    }
}
