//! Generate command implementation.

use crate::agent::AgentFactory;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Pipeline, PipelineError, Stage, RESEARCH_FILE};
use anyhow::Result;
use std::path::PathBuf;

/// Run the generate command.
pub async fn run_generate(
    topic: &str,
    output: Option<String>,
    no_save: bool,
    settings: Settings,
) -> Result<()> {
    if topic.trim().is_empty() {
        Output::warning("Please enter a research topic");
        return Ok(());
    }

    let output_dir = match output {
        Some(dir) => Settings::expand_path(&dir),
        None => settings.output_dir(),
    };

    // Pre-flight checks
    let save_dir = (!no_save).then_some(output_dir.as_path());
    match preflight::check(Operation::Generate, &settings, save_dir) {
        Ok(warnings) => {
            for warning in &warnings {
                Output::warning(warning);
            }
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'scriptcast doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    }

    let factory = AgentFactory::from_settings(&settings)?;
    let pipeline = Pipeline::from_factory(&factory);

    for slot in [pipeline.research_agent(), pipeline.script_agent()] {
        if let Some(reason) = slot.reason() {
            Output::error(&format!("Agent initialization failed: {}", reason));
        }
    }

    let spinner = Output::spinner("Researching the topic...");
    let result = pipeline
        .generate_with_progress(topic, |stage| match stage {
            Stage::Research => spinner.set_message("Researching the topic..."),
            Stage::Script => spinner.set_message("Generating YouTube script..."),
        })
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(generated) => {
            Output::document("Research Results", &generated.research);
            Output::document("YouTube Script", &generated.script);

            if !no_save {
                let paths = generated.write_to(&output_dir)?;
                Output::success("Saved markdown files:");
                for path in &paths {
                    Output::list_item(&path.display().to_string());
                }
            }
            Ok(())
        }
        Err(PipelineError::EmptyTopic) => {
            Output::warning("Please enter a research topic");
            Ok(())
        }
        Err(e) => {
            if let Some(research) = e.research() {
                Output::document("Research Results", research);
                if !no_save {
                    let path = save_research(&output_dir, research)?;
                    Output::info(&format!("Research saved to {}", path.display()));
                }
            }
            Output::error(&e.to_string());
            Err(e.into())
        }
    }
}

/// Keep the research of a run whose script stage failed.
fn save_research(dir: &std::path::Path, research: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(RESEARCH_FILE);
    std::fs::write(&path, research)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_research() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_research(&dir.path().join("out"), "# Notes").unwrap();
        assert!(path.ends_with("research.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Notes");
    }

    #[tokio::test]
    async fn test_blank_topic_is_a_warning() {
        let mut settings = Settings::default();
        settings.model.api_key_env = "SCRIPTCAST_TEST_GENERATE_UNSET".to_string();
        assert!(run_generate("   ", None, true, settings).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_key_reaches_the_pipeline() {
        let mut settings = Settings::default();
        settings.model.api_key_env = "SCRIPTCAST_TEST_GENERATE_UNSET".to_string();

        let err = run_generate("tides", None, true, settings).await.unwrap_err();
        assert_eq!(err.to_string(), "Agent not properly initialized");
    }

    #[tokio::test]
    async fn test_output_flag_overrides_configured_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.model.api_key_env = "SCRIPTCAST_TEST_GENERATE_UNSET".to_string();
        settings.general.output_dir = file.path().to_string_lossy().to_string();

        // Gets past preflight to the pipeline despite the configured file path.
        let output = Some(out.path().to_string_lossy().to_string());
        let err = run_generate("tides", output, false, settings).await.unwrap_err();
        assert_eq!(err.to_string(), "Agent not properly initialized");
    }
}
