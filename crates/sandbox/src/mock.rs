//! Mock Sandbox backend
//!
//! Programmable mock for gateway and handler tests:
//! - `MockSandboxBackend`: scripted outcomes with call recording
//! - Outcomes are consumed in order; once the script runs dry the default
//!   outcome is returned for every further call

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::{BackendCall, CallFailure, SandboxBackend};

type Outcome = Result<Option<Value>, CallFailure>;

/// A recorded backend call for test assertions
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub credential: String,
    pub call: BackendCall,
}

#[derive(Debug)]
struct MockState {
    script: VecDeque<Outcome>,
    default: Outcome,
    history: Vec<RecordedCall>,
}

/// Mock backend with scripted outcomes
#[derive(Debug, Clone)]
pub struct MockSandboxBackend {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockSandboxBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSandboxBackend {
    /// Mock that answers every call with `{}`
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                script: VecDeque::new(),
                default: Ok(Some(json!({}))),
                history: Vec::new(),
            })),
        }
    }

    /// Outcome returned once the script is exhausted
    pub fn set_default(&self, outcome: Outcome) {
        self.state.lock().unwrap().default = outcome;
    }

    pub fn push_ok(&self, value: Value) {
        self.push(Ok(Some(value)));
    }

    pub fn push_empty(&self) {
        self.push(Ok(None));
    }

    pub fn push_status(&self, status: u16, message: &str) {
        self.push(Err(CallFailure::Status {
            status,
            message: message.to_string(),
        }));
    }

    pub fn push(&self, outcome: Outcome) {
        self.state.lock().unwrap().script.push_back(outcome);
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().history.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().history.len()
    }

    /// Clear script, history and default
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.script.clear();
        state.history.clear();
        state.default = Ok(Some(json!({})));
    }
}

#[async_trait::async_trait]
impl SandboxBackend for MockSandboxBackend {
    async fn call(&self, credential: &str, call: &BackendCall) -> Outcome {
        let mut state = self.state.lock().unwrap();
        state.history.push(RecordedCall {
            credential: credential.to_string(),
            call: call.clone(),
        });

        tracing::debug!(path = %call.display_path(), "Mock Sandbox API call");

        match state.script.pop_front() {
            Some(outcome) => outcome,
            None => state.default.clone(),
        }
    }
}
