//! Role-bound agents and response extraction.
//!
//! An agent pairs the remote chat model with a role's instructions and,
//! for research, the web search tool. [`run_agent`] is the boundary where
//! every remote failure is turned into a [`GenerationResult`].

mod extractor;
mod factory;
mod runner;
mod tools;

pub use extractor::{run_agent, GenerationError, GenerationResult};
pub use factory::{AgentFactory, AgentHandle, AgentSlot, Role};
pub use runner::{AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, ToolCall, ToolContext};
