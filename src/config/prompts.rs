//! Role prompts for Scriptcast.
//!
//! Prompts can be customized by placing `research.toml` and `script.toml`
//! in the custom prompts directory.

use crate::agent::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Line appended to the system message when markdown output is requested.
const MARKDOWN_INSTRUCTION: &str = "Use markdown to format your answers.";

/// Prompts for both pipeline roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub research: RolePrompts,
    pub script: RolePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            research: RolePrompts {
                description: "You are a research assistant. Investigate the topic the user gives you \
                    using web search and write well-organized research notes."
                    .to_string(),
                instructions: vec![
                    "Always include sources and give answer to the point.".to_string(),
                ],
            },
            script: RolePrompts {
                description: "You are a YouTube script writer. Turn the research notes the user gives you \
                    into an engaging narrated script."
                    .to_string(),
                instructions: vec![
                    "Always start with a question to increase curiosity and at end of script ask a question to listeners"
                        .to_string(),
                ],
            },
            variables: HashMap::new(),
        }
    }
}

/// Description and ordered instructions for one role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePrompts {
    pub description: String,
    pub instructions: Vec<String>,
}

impl Prompts {
    /// Load prompts, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let research_path = custom_path.join("research.toml");
            if research_path.exists() {
                let content = std::fs::read_to_string(&research_path)?;
                prompts.research = toml::from_str(&content)?;
            }

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Prompts for the given role.
    pub fn role(&self, role: Role) -> &RolePrompts {
        match role {
            Role::Research => &self.research,
            Role::Script => &self.script,
        }
    }

    /// Build the system message for an agent.
    ///
    /// Layout: description, then an `## Instructions` list in the given order,
    /// with the markdown directive last when enabled.
    pub fn system_message(
        &self,
        description: &str,
        instructions: &[String],
        markdown: bool,
    ) -> String {
        let mut message = String::new();

        let description = self.render_with_custom(description, &HashMap::new());
        if !description.trim().is_empty() {
            message.push_str(description.trim());
            message.push_str("\n\n");
        }

        message.push_str("## Instructions\n");
        for instruction in instructions {
            let rendered = self.render_with_custom(instruction, &HashMap::new());
            message.push_str(&format!("- {}\n", rendered.trim()));
        }
        if markdown {
            message.push_str(&format!("- {}\n", MARKDOWN_INSTRUCTION));
        }

        message.trim_end().to_string()
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
