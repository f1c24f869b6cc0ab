//! OpenAI-compatible chat completions client.
//!
//! Requests and responses use the async-openai types. The HTTP exchange is
//! done here so an error status is never mistaken for an undecodable reply.

use crate::config::ModelSettings;
use crate::error::{Result, ScriptcastError};
use async_openai::types::{CreateChatCompletionRequest, CreateChatCompletionResponse};
use std::time::Duration;
use tracing::debug;

/// Longest slice of an error body carried into the error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the `/chat/completions` endpoint of an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

/// Create a client for the configured endpoint.
///
/// Fails when the API key variable is unset or the HTTP client cannot be built.
pub fn create_client(settings: &ModelSettings) -> Result<ChatCompletionsClient> {
    let api_key = settings.api_key()?;
    create_client_with_timeout(
        &settings.api_base,
        &api_key,
        Duration::from_secs(settings.timeout_secs),
    )
}

/// Create a client with an explicit endpoint, key and timeout.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<ChatCompletionsClient> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScriptcastError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(ChatCompletionsClient {
        http,
        endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        api_key: api_key.to_string(),
    })
}

impl ChatCompletionsClient {
    /// Send one chat completion request.
    ///
    /// A non-success status is an API error. Only a success body that does
    /// not decode is a malformed response.
    pub async fn create(
        &self,
        request: &CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ScriptcastError::OpenAI(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ScriptcastError::OpenAI(format!("Failed to read response: {}", e)))?;
        debug!("Chat completion returned {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(ScriptcastError::OpenAI(format!(
                "HTTP {}: {}",
                status,
                error_detail(&body)
            )));
        }

        serde_json::from_slice(&body).map_err(|e| {
            ScriptcastError::MalformedResponse(format!("Could not decode model response: {}", e))
        })
    }
}

/// Pull a readable message out of an error body.
///
/// Understands `{"error": {"message": ..}}` and `{"error": ".."}`, and falls
/// back to the start of the raw body.
fn error_detail(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        let error = &value["error"];
        if let Some(message) = error["message"].as_str().or_else(|| error.as_str()) {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    text.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_reads_json_shapes() {
        assert_eq!(
            error_detail(br#"{"error":{"message":"rate limited","type":"requests"}}"#),
            "rate limited"
        );
        assert_eq!(error_detail(br#"{"error":"Model is overloaded"}"#), "Model is overloaded");
    }

    #[test]
    fn test_error_detail_truncates_html() {
        let page = format!("<html>{}</html>", "x".repeat(500));
        let detail = error_detail(page.as_bytes());
        assert!(detail.starts_with("<html>"));
        assert_eq!(detail.chars().count(), ERROR_BODY_LIMIT);
        assert_eq!(error_detail(b"  "), "empty response body");
    }

    #[test]
    fn test_endpoint_joins_base() {
        let client =
            create_client_with_timeout("http://localhost:8080/v1/", "key", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.endpoint, "http://localhost:8080/v1/chat/completions");
    }
}
