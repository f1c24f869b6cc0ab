//! Configuration settings for Scriptcast.

use crate::error::{Result, ScriptcastError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub search: SearchSettings,
    pub agent: AgentSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where generated markdown files are written.
    pub output_dir: String,
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Remote model binding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub api_base: String,
    /// Model identifier sent with every request.
    pub id: String,
    /// Generation-length ceiling in tokens.
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_base: "https://router.huggingface.co/v1".to_string(),
            id: "meta-llama/Meta-Llama-3-8B-Instruct".to_string(),
            max_tokens: 4096,
            api_key_env: "HF_TOKEN".to_string(),
            timeout_secs: 300,
        }
    }
}

impl ModelSettings {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => Err(ScriptcastError::Config(format!(
                "{} is empty. Set it with: export {}='...'",
                self.api_key_env, self.api_key_env
            ))),
            Err(_) => Err(ScriptcastError::Config(format!(
                "{} not set. Set it with: export {}='...'",
                self.api_key_env, self.api_key_env
            ))),
        }
    }
}

/// Web search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Attach the web search tool to the research agent.
    pub enabled: bool,
    /// Default number of results returned per query.
    pub max_results: usize,
    /// DuckDuckGo region code (e.g. "wt-wt", "us-en").
    pub region: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: 5,
            region: "wt-wt".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Agent behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum model calls per agent run, tool rounds included.
    pub max_tool_rounds: usize,
    /// Ask the model for markdown-formatted output.
    pub markdown: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: 5,
            markdown: true,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScriptcastError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scriptcast")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}
