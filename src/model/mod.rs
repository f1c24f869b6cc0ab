//! Remote chat model binding.
//!
//! The agents talk to the model only through [`ChatModel`], so the response
//! shape of the remote API is normalized here: a reply either carries text
//! and/or tool calls, or the call fails with a classified error.

#[cfg(test)]
pub(crate) mod mock;
mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(String),
    User(String),
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

/// Function tool offered to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments as produced by the model.
    pub arguments: String,
}

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
    pub max_tokens: u32,
}

/// The first choice of a completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Completion {
    /// Non-blank text content, if any.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
    }
}

/// Trait for chat completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion.
    ///
    /// A reply that cannot be decoded into a [`Completion`] is reported as
    /// [`crate::ScriptcastError::MalformedResponse`].
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;

    /// Identifier of the bound model.
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_text_ignores_blank() {
        let blank = Completion {
            content: Some("  \n".to_string()),
            tool_calls: Vec::new(),
        };
        assert_eq!(blank.text(), None);

        let filled = Completion {
            content: Some("Topic X is about Y.".to_string()),
            tool_calls: Vec::new(),
        };
        assert_eq!(filled.text(), Some("Topic X is about Y."));
    }
}
