//! Agent construction.

use super::tools::ToolContext;
use crate::config::{Prompts, Settings};
use crate::error::{Result, ScriptcastError};
use crate::model::{ChatModel, OpenAIChatModel};
use crate::search::{DuckDuckGoSearch, SearchClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Purpose of an agent in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Researches the topic, with web search.
    Research,
    /// Writes the narrated script from research notes.
    Script,
}

impl Role {
    /// Only the research role gets the web search tool.
    pub fn uses_search(self) -> bool {
        matches!(self, Role::Research)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "research" => Ok(Role::Research),
            "script" => Ok(Role::Script),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Research => write!(f, "research"),
            Role::Script => write!(f, "script"),
        }
    }
}

/// A fully configured agent. Immutable once built.
pub struct AgentHandle {
    pub(super) role: Role,
    pub(super) model: Arc<dyn ChatModel>,
    pub(super) tools: Option<ToolContext>,
    pub(super) instructions: Vec<String>,
    pub(super) system_prompt: String,
    pub(super) markdown: bool,
    pub(super) max_tokens: u32,
    pub(super) max_tool_rounds: usize,
}

impl AgentHandle {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn has_search(&self) -> bool {
        self.tools.is_some()
    }

    pub fn markdown(&self) -> bool {
        self.markdown
    }

    /// One-line summary for status output.
    pub fn describe(&self) -> String {
        let tools = match &self.tools {
            Some(tools) => format!("web search ({})", tools.search.name()),
            None => "no tools".to_string(),
        };
        format!("{} agent on {} with {}", self.role, self.model_id(), tools)
    }
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandle")
            .field("role", &self.role)
            .field("model", &self.model.model_id())
            .field("search", &self.has_search())
            .field("instructions", &self.instructions)
            .field("markdown", &self.markdown)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Either a ready agent or the marker left by a failed construction.
#[derive(Debug, Clone)]
pub enum AgentSlot {
    Ready(Arc<AgentHandle>),
    Unavailable { reason: String },
}

impl AgentSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, AgentSlot::Ready(_))
    }

    pub fn handle(&self) -> Option<&AgentHandle> {
        match self {
            AgentSlot::Ready(handle) => Some(handle),
            AgentSlot::Unavailable { .. } => None,
        }
    }

    /// Why construction failed, for unavailable slots.
    pub fn reason(&self) -> Option<&str> {
        match self {
            AgentSlot::Ready(_) => None,
            AgentSlot::Unavailable { reason } => Some(reason),
        }
    }
}

/// Builds role agents against the configured model and search provider.
pub struct AgentFactory {
    settings: Settings,
    prompts: Prompts,
    model: Option<Arc<dyn ChatModel>>,
    search: Option<Arc<dyn SearchClient>>,
}

impl AgentFactory {
    /// Create a factory that binds remote components from settings on demand.
    pub fn new(settings: Settings, prompts: Prompts) -> Self {
        Self {
            settings,
            prompts,
            model: None,
            search: None,
        }
    }

    /// Create a factory, loading prompts as configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        Ok(Self::new(settings.clone(), prompts))
    }

    /// Create a factory with pre-built components.
    ///
    /// A `None` search client falls back to the configured provider.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        model: Arc<dyn ChatModel>,
        search: Option<Arc<dyn SearchClient>>,
    ) -> Self {
        Self {
            settings,
            prompts,
            model: Some(model),
            search,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Build an agent for a role. Never fails: errors become `Unavailable`.
    pub fn create(&self, role: Role, instructions: Vec<String>) -> AgentSlot {
        match self.try_create(role, instructions) {
            Ok(handle) => {
                info!("Created {}", handle.describe());
                AgentSlot::Ready(Arc::new(handle))
            }
            Err(e) => {
                error!("Error creating {} agent: {}", role, e);
                AgentSlot::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Build both pipeline agents from the configured role prompts.
    pub fn create_pair(&self) -> (AgentSlot, AgentSlot) {
        let research = self.create(Role::Research, self.prompts.research.instructions.clone());
        let script = self.create(Role::Script, self.prompts.script.instructions.clone());
        (research, script)
    }

    fn try_create(&self, role: Role, instructions: Vec<String>) -> Result<AgentHandle> {
        if instructions.iter().all(|i| i.trim().is_empty()) {
            return Err(ScriptcastError::InvalidInput(format!(
                "{} agent needs at least one instruction",
                role
            )));
        }

        let model = match &self.model {
            Some(model) => model.clone(),
            None => {
                let model = OpenAIChatModel::from_settings(&self.settings.model)?;
                Arc::new(model) as Arc<dyn ChatModel>
            }
        };

        let tools = if role.uses_search() && self.settings.search.enabled {
            let search = match &self.search {
                Some(search) => search.clone(),
                None => {
                    let search = DuckDuckGoSearch::new(&self.settings.search)?;
                    Arc::new(search) as Arc<dyn SearchClient>
                }
            };
            Some(ToolContext::new(search, self.settings.search.max_results))
        } else {
            None
        };

        let markdown = self.settings.agent.markdown;
        let system_prompt = self.prompts.system_message(
            &self.prompts.role(role).description,
            &instructions,
            markdown,
        );

        Ok(AgentHandle {
            role,
            model,
            tools,
            instructions,
            system_prompt,
            markdown,
            max_tokens: self.settings.model.max_tokens,
            max_tool_rounds: self.settings.agent.max_tool_rounds.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mock::ScriptedModel;
    use crate::search::mock::StaticSearch;

    fn factory_with_mocks(settings: Settings) -> AgentFactory {
        AgentFactory::with_components(
            settings,
            Prompts::default(),
            Arc::new(ScriptedModel::new(Vec::new())),
            Some(Arc::new(StaticSearch::new(Vec::new()))),
        )
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Research".parse::<Role>().unwrap(), Role::Research);
        assert_eq!("script".parse::<Role>().unwrap(), Role::Script);
        assert!("narrator".parse::<Role>().is_err());
        assert_eq!(Role::Script.to_string(), "script");
    }

    #[test]
    fn test_search_attached_only_to_research() {
        let factory = factory_with_mocks(Settings::default());

        let research = factory.create(Role::Research, vec!["Cite sources.".to_string()]);
        let script = factory.create(Role::Script, vec!["Open with a question.".to_string()]);

        assert!(research.handle().unwrap().has_search());
        assert!(!script.handle().unwrap().has_search());
    }

    #[test]
    fn test_search_disabled_in_settings() {
        let mut settings = Settings::default();
        settings.search.enabled = false;
        let factory = factory_with_mocks(settings);

        let research = factory.create(Role::Research, vec!["Cite sources.".to_string()]);
        assert!(!research.handle().unwrap().has_search());
    }

    #[test]
    fn test_handle_binds_fixed_model_settings() {
        let factory = factory_with_mocks(Settings::default());
        let slot = factory.create(
            Role::Script,
            vec!["First.".to_string(), "Second.".to_string()],
        );
        let handle = slot.handle().unwrap();

        assert_eq!(handle.max_tokens, 4096);
        assert!(handle.markdown());
        assert_eq!(
            handle.instructions().to_vec(),
            vec!["First.".to_string(), "Second.".to_string()]
        );
        let prompt = handle.system_prompt();
        assert!(prompt.find("- First.").unwrap() < prompt.find("- Second.").unwrap());
        assert!(prompt.ends_with("- Use markdown to format your answers."));
    }

    #[test]
    fn test_empty_instructions_are_unavailable() {
        let factory = factory_with_mocks(Settings::default());
        let slot = factory.create(Role::Research, Vec::new());
        assert!(!slot.is_ready());
        assert!(slot.reason().unwrap().contains("at least one instruction"));
    }

    #[test]
    fn test_missing_credentials_are_unavailable() {
        let mut settings = Settings::default();
        settings.model.api_key_env = "SCRIPTCAST_TEST_FACTORY_KEY_UNSET".to_string();
        let factory = AgentFactory::new(settings, Prompts::default());

        let (research, script) = factory.create_pair();
        assert!(!research.is_ready());
        assert!(!script.is_ready());
        assert!(research.reason().unwrap().contains("SCRIPTCAST_TEST_FACTORY_KEY_UNSET"));
    }

    #[test]
    fn test_create_pair_uses_role_prompts() {
        let factory = factory_with_mocks(Settings::default());
        let (research, script) = factory.create_pair();

        assert_eq!(research.handle().unwrap().role(), Role::Research);
        assert_eq!(
            script.handle().unwrap().instructions()[0],
            "Always start with a question to increase curiosity and at end of script ask a question to listeners"
        );
    }
}
