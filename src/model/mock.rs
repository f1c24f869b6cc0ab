//! Scripted chat model for unit tests.

use super::{ChatModel, Completion, CompletionRequest, ToolCallRequest};
use crate::error::{Result, ScriptcastError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A completion with text content.
    Text(String),
    /// A completion with neither text nor tool calls.
    Empty,
    /// A completion asking for tool calls.
    ToolCalls(Vec<ToolCallRequest>),
    /// A reply that could not be decoded.
    Malformed(String),
    /// A transport or API failure.
    Fail(String),
}

/// Chat model that plays back a fixed list of replies and records requests.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copy of every request received.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Fail("no scripted reply left".to_string()));

        match reply {
            Reply::Text(text) => Ok(Completion {
                content: Some(text),
                tool_calls: Vec::new(),
            }),
            Reply::Empty => Ok(Completion::default()),
            Reply::ToolCalls(tool_calls) => Ok(Completion {
                content: None,
                tool_calls,
            }),
            Reply::Malformed(msg) => Err(ScriptcastError::MalformedResponse(msg)),
            Reply::Fail(msg) => Err(ScriptcastError::OpenAI(msg)),
        }
    }

    fn model_id(&self) -> &str {
        "scripted-test-model"
    }
}
