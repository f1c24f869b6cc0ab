//! Pipeline orchestrator for Scriptcast.
//!
//! Runs Research then Script, stopping at the first failed stage.

use crate::agent::{run_agent, AgentFactory, AgentSlot, GenerationError};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// File name of the research artifact.
pub const RESEARCH_FILE: &str = "research.md";
/// File name of the script artifact.
pub const SCRIPT_FILE: &str = "youtube_script.md";
/// Content type of both artifacts.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Research,
    Script,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Research => write!(f, "research"),
            Stage::Script => write!(f, "script"),
        }
    }
}

/// Why a pipeline run produced no complete output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The topic was empty or whitespace. No stage ran.
    #[error("Please enter a research topic")]
    EmptyTopic,

    #[error("{error}")]
    Research { error: GenerationError },

    /// The script stage failed; the research text is kept.
    #[error("{error}")]
    Script {
        error: GenerationError,
        research: String,
    },
}

impl PipelineError {
    /// The stage that failed, if any stage ran.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::EmptyTopic => None,
            PipelineError::Research { .. } => Some(Stage::Research),
            PipelineError::Script { .. } => Some(Stage::Script),
        }
    }

    /// Research text that survived a script-stage failure.
    pub fn research(&self) -> Option<&str> {
        match self {
            PipelineError::Script { research, .. } => Some(research),
            _ => None,
        }
    }

    /// Whether this is a user input problem rather than a stage failure.
    pub fn is_user_input(&self) -> bool {
        matches!(self, PipelineError::EmptyTopic)
    }
}

/// A downloadable file produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub content: String,
}

/// Both artifacts of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub topic: String,
    pub research: String,
    pub script: String,
    pub generated_at: DateTime<Utc>,
}

impl PipelineOutput {
    /// The research and script files, in that order.
    pub fn artifacts(&self) -> [Artifact; 2] {
        [
            Artifact {
                file_name: RESEARCH_FILE,
                mime: MARKDOWN_MIME,
                content: self.research.clone(),
            },
            Artifact {
                file_name: SCRIPT_FILE,
                mime: MARKDOWN_MIME,
                content: self.script.clone(),
            },
        ]
    }

    /// Write both artifacts into a directory, returning their paths.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut paths = Vec::with_capacity(2);
        for artifact in self.artifacts() {
            let path = dir.join(artifact.file_name);
            std::fs::write(&path, &artifact.content)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

/// Health of the agent pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SystemStatus {
    Operational,
    Degraded { unavailable: Vec<String> },
}

/// One session's pair of agents.
#[derive(Debug, Clone)]
pub struct Pipeline {
    research: AgentSlot,
    script: AgentSlot,
}

impl Pipeline {
    pub fn new(research: AgentSlot, script: AgentSlot) -> Self {
        Self { research, script }
    }

    /// Build the agent pair for a new session.
    pub fn from_factory(factory: &AgentFactory) -> Self {
        let (research, script) = factory.create_pair();
        Self::new(research, script)
    }

    pub fn research_agent(&self) -> &AgentSlot {
        &self.research
    }

    pub fn script_agent(&self) -> &AgentSlot {
        &self.script
    }

    pub fn status(&self) -> SystemStatus {
        let slots = [(Stage::Research, &self.research), (Stage::Script, &self.script)];
        let unavailable: Vec<String> = slots
            .into_iter()
            .filter_map(|(stage, slot)| {
                slot.reason()
                    .map(|reason| format!("{} agent: {}", stage, reason))
            })
            .collect();

        if unavailable.is_empty() {
            SystemStatus::Operational
        } else {
            SystemStatus::Degraded { unavailable }
        }
    }

    /// Run the pipeline for a topic.
    pub async fn generate(
        &self,
        topic: &str,
    ) -> std::result::Result<PipelineOutput, PipelineError> {
        self.generate_with_progress(topic, |_| {}).await
    }

    /// Run the pipeline, calling `on_stage` before each stage starts.
    #[instrument(skip(self, on_stage), fields(topic = %topic))]
    pub async fn generate_with_progress<F>(
        &self,
        topic: &str,
        mut on_stage: F,
    ) -> std::result::Result<PipelineOutput, PipelineError>
    where
        F: FnMut(Stage),
    {
        let topic = topic.trim();
        if topic.is_empty() {
            warn!("Rejected empty topic");
            return Err(PipelineError::EmptyTopic);
        }

        on_stage(Stage::Research);
        let research = run_agent(&self.research, topic)
            .await
            .map_err(|error| PipelineError::Research { error })?;
        info!("Research stage produced {} bytes", research.len());

        on_stage(Stage::Script);
        let script = match run_agent(&self.script, &research).await {
            Ok(script) => script,
            Err(error) => return Err(PipelineError::Script { error, research }),
        };
        info!("Script stage produced {} bytes", script.len());

        Ok(PipelineOutput {
            topic: topic.to_string(),
            research,
            script,
            generated_at: Utc::now(),
        })
    }
}
