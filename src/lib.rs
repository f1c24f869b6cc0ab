//! Scriptcast - Research & Script Generator
//!
//! Takes a topic, has a research agent (with web search) write notes on it,
//! then has a script agent turn those notes into a narrated YouTube script.
//!
//! # Architecture
//!
//! - `config` - Settings and role prompts
//! - `model` - Remote chat model binding
//! - `search` - Web search capability
//! - `agent` - Agent factory, tool loop and response extraction
//! - `orchestrator` - The two-stage pipeline
//! - `cli` - Command line and HTTP delivery
//!
//! # Example
//!
//! ```rust,no_run
//! use scriptcast::agent::AgentFactory;
//! use scriptcast::config::Settings;
//! use scriptcast::orchestrator::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let factory = AgentFactory::from_settings(&settings)?;
//!     let pipeline = Pipeline::from_factory(&factory);
//!
//!     match pipeline.generate("why governments should not print more money").await {
//!         Ok(output) => println!("{}\n\n{}", output.research, output.script),
//!         Err(e) => eprintln!("{}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod openai;
pub mod orchestrator;
pub mod search;

pub use error::{Result, ScriptcastError};
