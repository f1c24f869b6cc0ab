//! Tool definitions and execution for agents.

use crate::error::{Result, ScriptcastError};
use crate::model::ToolSpec;
use crate::search::{format_hits, SearchClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on results a single tool call may request.
const MAX_RESULTS_CAP: usize = 10;

/// Available tools for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search the web.
    WebSearch {
        query: String,
        #[serde(default)]
        max_results: Option<usize>,
    },
}

/// Tool execution context. Only research agents carry one.
pub struct ToolContext {
    pub search: Arc<dyn SearchClient>,
    pub default_results: usize,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(search: Arc<dyn SearchClient>, default_results: usize) -> Self {
        Self {
            search,
            default_results,
        }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::WebSearch { query, max_results } => {
                let limit = max_results
                    .unwrap_or(self.default_results)
                    .clamp(1, MAX_RESULTS_CAP);
                let hits = self.search.search(query, limit).await?;
                Ok(format_hits(query, &hits))
            }
        }
    }

    /// Tool specs offered to the model.
    pub fn definitions(&self) -> Vec<ToolSpec> {
        vec![ToolSpec {
            name: "web_search".to_string(),
            description: format!(
                "Search the web with {} and return titles, links and snippets. \
                Use this to find current facts and sources for the research topic.",
                self.search.name()
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": format!(
                            "Maximum number of results (default: {})",
                            self.default_results
                        ),
                        "default": self.default_results
                    }
                },
                "required": ["query"]
            }),
        }]
    }
}

/// Parse a tool call from the model's function-call format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| ScriptcastError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "web_search" => {
            let query = args["query"]
                .as_str()
                .filter(|q| !q.trim().is_empty())
                .ok_or_else(|| ScriptcastError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            let max_results = args["max_results"].as_u64().map(|n| n as usize);
            Ok(ToolCall::WebSearch { query, max_results })
        }
        _ => Err(ScriptcastError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::mock::StaticSearch;
    use crate::search::SearchHit;

    #[test]
    fn test_parse_web_search_tool() {
        let tool =
            parse_tool_call("web_search", r#"{"query": "solar panels", "max_results": 3}"#)
                .unwrap();
        assert_eq!(
            tool,
            ToolCall::WebSearch {
                query: "solar panels".to_string(),
                max_results: Some(3),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing() {
        assert!(parse_tool_call("get_transcript", "{}").is_err());
        assert!(parse_tool_call("web_search", r#"{"max_results": 3}"#).is_err());
        assert!(parse_tool_call("web_search", "not json").is_err());
    }

    #[tokio::test]
    async fn test_execute_clamps_limit() {
        let hits = (0..20)
            .map(|i| SearchHit {
                title: format!("Result {}", i),
                url: format!("https://example.com/{}", i),
                snippet: String::new(),
            })
            .collect();
        let search = Arc::new(StaticSearch::new(hits));
        let context = ToolContext::new(search.clone(), 5);

        let output = context
            .execute(&ToolCall::WebSearch {
                query: "wind".to_string(),
                max_results: Some(50),
            })
            .await
            .unwrap();

        assert!(output.starts_with("Found 10 web results"));
        assert_eq!(search.queries(), vec!["wind".to_string()]);
    }
}
