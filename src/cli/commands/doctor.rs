//! Doctor command - verify configuration and credentials.

use crate::agent::AgentFactory;
use crate::cli::output::mask_secret;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Pipeline, SystemStatus};
use console::style;
use std::path::{Path, PathBuf};

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks against `config_path`, or the default location.
pub fn run_doctor(settings: &Settings, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    Output::header("Scriptcast Doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    let mut section = |title: &str, results: Vec<CheckResult>| {
        println!("{}", style(title).bold());
        for check in &results {
            check.print();
        }
        println!();
        checks.extend(results);
    };

    section("Model", vec![check_api_key(settings), check_endpoint(settings)]);
    section("Web Search", vec![check_search(settings)]);
    section("Directories", vec![check_output_dir(settings)]);
    section("Configuration", vec![check_config_file(&config_path)]);
    section("System Status", vec![check_agents(settings)]);

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Scriptcast is ready to use.");
    }

    Ok(())
}

/// Check that the API key variable is set.
fn check_api_key(settings: &Settings) -> CheckResult {
    let name = settings.model.api_key_env.as_str();
    match settings.model.api_key() {
        Ok(key) => CheckResult::ok(name, &format!("configured ({})", mask_secret(&key))),
        Err(e) => CheckResult::error(
            name,
            &e.to_string(),
            &format!("Set it in your shell or a .env file: {}=...", name),
        ),
    }
}

/// Check the model endpoint and identifier.
fn check_endpoint(settings: &Settings) -> CheckResult {
    let model = &settings.model;
    match url::Url::parse(&model.api_base) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !model.id.trim().is_empty() => {
            CheckResult::ok(
                "Endpoint",
                &format!("{} @ {} (max {} tokens)", model.id, url, model.max_tokens),
            )
        }
        Ok(_) if model.id.trim().is_empty() => CheckResult::error(
            "Endpoint",
            "model.id is empty",
            "Set model.id in the config file",
        ),
        _ => CheckResult::error(
            "Endpoint",
            &format!("invalid api_base: {}", model.api_base),
            "Use an http(s) URL of an OpenAI-compatible API",
        ),
    }
}

fn check_search(settings: &Settings) -> CheckResult {
    if settings.search.enabled {
        CheckResult::ok(
            "DuckDuckGo",
            &format!(
                "enabled ({} results, region {})",
                settings.search.max_results, settings.search.region
            ),
        )
    } else {
        CheckResult::warning(
            "DuckDuckGo",
            "disabled",
            "Research will rely on the model alone; set search.enabled = true",
        )
    }
}

fn check_output_dir(settings: &Settings) -> CheckResult {
    let dir = settings.output_dir();
    if dir.is_dir() {
        CheckResult::ok("Output directory", &format!("{}", dir.display()))
    } else if dir.exists() {
        CheckResult::error(
            "Output directory",
            &format!("{} is not a directory", dir.display()),
            "Set general.output_dir to a directory",
        )
    } else {
        CheckResult::warning(
            "Output directory",
            &format!("{} (will be created)", dir.display()),
            "Directory will be created on first run",
        )
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: scriptcast config edit",
        )
    }
}

/// Build the agent pair the way a session would.
fn check_agents(settings: &Settings) -> CheckResult {
    let factory = match AgentFactory::from_settings(settings) {
        Ok(factory) => factory,
        Err(e) => {
            return CheckResult::error(
                "Agents",
                &format!("prompts could not be loaded: {}", e),
                "Check the files in prompts.custom_dir",
            )
        }
    };

    match Pipeline::from_factory(&factory).status() {
        SystemStatus::Operational => CheckResult::ok("Agents", "All systems operational"),
        SystemStatus::Degraded { unavailable } => CheckResult::error(
            "Agents",
            &format!("Agent initialization failed: {}", unavailable.join("; ")),
            "Fix the errors above and run doctor again",
        ),
    }
}
