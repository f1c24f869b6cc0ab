//! Web search capability for the research agent.
//!
//! The pipeline never calls search directly; it is only reachable as the
//! `web_search` tool of a research agent.

mod duckduckgo;
#[cfg(test)]
pub(crate) mod mock;

pub use duckduckgo::DuckDuckGoSearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single web search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl std::fmt::Display for SearchHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]({})", self.title, self.url)?;
        if !self.snippet.is_empty() {
            write!(f, "\n   {}", self.snippet)?;
        }
        Ok(())
    }
}

/// Trait for web search providers.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search the web, returning at most `limit` hits.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    /// Provider name for logs and status output.
    fn name(&self) -> &str;
}

/// Format hits as a numbered list for a tool result.
pub fn format_hits(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No web results found for \"{}\".", query);
    }

    let formatted = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {}", i + 1, hit))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Found {} web results for \"{}\":\n\n{}",
        hits.len(),
        query,
        formatted
    )
}
