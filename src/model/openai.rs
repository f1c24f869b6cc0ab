//! OpenAI-compatible chat completion backend.

use super::{ChatModel, Completion, CompletionRequest, Message, ToolCallRequest, ToolSpec};
use crate::config::ModelSettings;
use crate::error::{Result, ScriptcastError};
use crate::openai::{create_client, ChatCompletionsClient};
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model served through an OpenAI-compatible API.
pub struct OpenAIChatModel {
    client: ChatCompletionsClient,
    model: String,
}

impl OpenAIChatModel {
    /// Bind to the model described by the settings.
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        if settings.id.trim().is_empty() {
            return Err(ScriptcastError::Config("model.id is empty".to_string()));
        }
        if !settings.api_base.starts_with("http://") && !settings.api_base.starts_with("https://") {
            return Err(ScriptcastError::Config(format!(
                "model.api_base is not an http(s) URL: {}",
                settings.api_base
            )));
        }

        Ok(Self::with_client(create_client(settings)?, &settings.id))
    }

    /// Bind to `model` on an already configured client.
    pub fn with_client(client: ChatCompletionsClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn convert_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
        let converted = match message {
            Message::System(content) => ChatCompletionRequestSystemMessageArgs::default()
                .content(content.clone())
                .build()
                .map_err(build_error)?
                .into(),
            Message::User(content) => ChatCompletionRequestUserMessageArgs::default()
                .content(content.clone())
                .build()
                .map_err(build_error)?
                .into(),
            Message::Assistant {
                content,
                tool_calls,
            } => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if let Some(text) = content {
                    args.content(text.clone());
                }
                if !tool_calls.is_empty() {
                    args.tool_calls(
                        tool_calls
                            .iter()
                            .map(|call| ChatCompletionMessageToolCall {
                                id: call.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: call.name.clone(),
                                    arguments: call.arguments.clone(),
                                },
                            })
                            .collect::<Vec<_>>(),
                    );
                }
                args.build().map_err(build_error)?.into()
            }
            Message::Tool {
                tool_call_id,
                content,
            } => ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(tool_call_id.clone())
                .content(content.clone())
                .build()
                .map_err(build_error)?
                .into(),
        };
        Ok(converted)
    }

    fn convert_tool(tool: &ToolSpec) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters.clone()),
                strict: None,
            },
        }
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[allow(deprecated)]
    #[instrument(
        skip(self, request),
        fields(model = %self.model, messages = request.messages.len())
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        let messages = request
            .messages
            .iter()
            .map(Self::convert_message)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages)
            .max_tokens(request.max_tokens);
        if !request.tools.is_empty() {
            args.tools(request.tools.iter().map(Self::convert_tool).collect::<Vec<_>>());
        }
        let api_request = args.build().map_err(build_error)?;

        let response = self.client.create(&api_request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ScriptcastError::MalformedResponse("No choices in model response".to_string())
        })?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        debug!(
            "Completion received ({} tool calls, content: {})",
            tool_calls.len(),
            choice.message.content.is_some()
        );

        Ok(Completion {
            content: choice.message.content,
            tool_calls,
        })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn build_error(e: OpenAIError) -> ScriptcastError {
    ScriptcastError::Agent(format!("Failed to build request: {}", e))
}
