//! Configuration module for Scriptcast.
//!
//! Handles loading and managing application settings and role prompts.

mod prompts;
mod settings;

pub use prompts::{Prompts, RolePrompts};
pub use settings::{
    AgentSettings, GeneralSettings, ModelSettings, PromptSettings, SearchSettings, Settings,
};
