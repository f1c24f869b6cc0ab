//! Agent runner with tool calling loop.

use super::factory::AgentHandle;
use super::tools::parse_tool_call;
use crate::error::{Result, ScriptcastError};
use crate::model::{CompletionRequest, Message, ToolCallRequest};
use tracing::{debug, info, instrument};

impl AgentHandle {
    /// Run the agent on an input: instructions, then tool rounds until the
    /// model answers with text.
    #[instrument(skip(self, input), fields(role = %self.role, input_len = input.len()))]
    pub async fn run(&self, input: &str) -> Result<AgentResponse> {
        let mut messages = vec![
            Message::System(self.system_prompt.clone()),
            Message::User(input.to_string()),
        ];
        let tool_specs = self
            .tools
            .as_ref()
            .map(|tools| tools.definitions())
            .unwrap_or_default();

        let mut tool_calls_made = Vec::new();

        for iterations in 1..=self.max_tool_rounds {
            // The last round offers no tools so the model has to answer.
            let final_round = iterations == self.max_tool_rounds;
            debug!("Agent iteration {}", iterations);

            let completion = self
                .model
                .complete(CompletionRequest {
                    messages: messages.clone(),
                    tools: if final_round { Vec::new() } else { tool_specs.clone() },
                    max_tokens: self.max_tokens,
                })
                .await?;

            let answered = completion.tool_calls.is_empty()
                || self.tools.is_none()
                || (final_round && completion.text().is_some());
            if answered {
                let content = completion.text().ok_or_else(|| {
                    ScriptcastError::MalformedResponse(
                        "Model reply has no text content".to_string(),
                    )
                })?;

                return Ok(AgentResponse {
                    content: content.to_string(),
                    tool_calls: tool_calls_made,
                    iterations,
                });
            }
            if final_round {
                break;
            }

            messages.push(Message::Assistant {
                content: completion.content.clone(),
                tool_calls: completion.tool_calls.clone(),
            });

            for tool_call in &completion.tool_calls {
                let record = self.execute_tool_call(tool_call).await;
                messages.push(Message::Tool {
                    tool_call_id: tool_call.id.clone(),
                    content: record.result.clone(),
                });
                tool_calls_made.push(record);
            }
        }

        Err(ScriptcastError::Agent(format!(
            "Agent exceeded maximum iterations ({})",
            self.max_tool_rounds
        )))
    }

    /// Direct model call with only the input: no instructions, no tools.
    #[instrument(skip(self, input), fields(role = %self.role, input_len = input.len()))]
    pub async fn chat(&self, input: &str) -> Result<String> {
        let completion = self
            .model
            .complete(CompletionRequest {
                messages: vec![Message::User(input.to_string())],
                tools: Vec::new(),
                max_tokens: self.max_tokens,
            })
            .await?;

        completion
            .text()
            .map(str::to_string)
            .ok_or_else(|| {
                ScriptcastError::MalformedResponse("Direct reply has no text content".to_string())
            })
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Failures are reported back to the model as the tool result.
    async fn execute_tool_call(&self, tool_call: &ToolCallRequest) -> ToolCallRecord {
        info!("Agent calling tool: {} with args: {}", tool_call.name, tool_call.arguments);

        let result = match (&self.tools, parse_tool_call(&tool_call.name, &tool_call.arguments)) {
            (Some(tools), Ok(tool)) => match tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            (None, _) => format!("Tool not available: {}", tool_call.name),
            (_, Err(e)) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: tool_call.name.clone(),
            arguments: tool_call.arguments.clone(),
            result,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (model calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
