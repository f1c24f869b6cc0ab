//! Normalizes agent runs into a [`GenerationResult`].

use super::factory::AgentSlot;
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a stage produced no text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The agent was never built.
    #[error("Agent not properly initialized")]
    Unavailable,

    /// The remote call failed.
    #[error("Error: {0}")]
    Invocation(String),

    /// The reply was malformed and the direct-call fallback failed too.
    #[error("Error processing request: {0}")]
    Fallback(String),
}

/// Text from a stage, or the reason it failed.
pub type GenerationResult = std::result::Result<String, GenerationError>;

/// Run an agent and extract its text.
///
/// A malformed reply triggers exactly one direct model call with the same
/// input. Every failure is logged and returned as data.
pub async fn run_agent(slot: &AgentSlot, input: &str) -> GenerationResult {
    let handle = match slot {
        AgentSlot::Ready(handle) => handle,
        AgentSlot::Unavailable { .. } => return Err(GenerationError::Unavailable),
    };

    match handle.run(input).await {
        Ok(response) => {
            info!(
                "{} agent finished in {} iteration(s), {} tool call(s)",
                handle.role(),
                response.iterations,
                response.tool_calls.len()
            );
            Ok(response.content)
        }
        Err(e) if e.is_malformed_response() => {
            warn!("{} agent reply was malformed ({}), trying direct call", handle.role(), e);
            match handle.chat(input).await {
                Ok(text) => Ok(text),
                Err(inner) => {
                    error!("Alternative approach failed: {}", inner);
                    Err(GenerationError::Fallback(inner.to_string()))
                }
            }
        }
        Err(e) => {
            error!("Error running {} agent: {}\n{:?}", handle.role(), e, e);
            Err(GenerationError::Invocation(e.to_string()))
        }
    }
}
