//! Config command implementation.

use std::path::{Path, PathBuf};

use crate::cli::output::mask_secret;
use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};

/// Run the config command against `config_path`, or the default location.
pub fn run_config(
    action: &ConfigAction,
    settings: Settings,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str =
                toml::to_string_pretty(&settings).context("Failed to serialize config")?;
            println!("{}", toml_str);

            Output::header("Resolved");
            for (key, value) in resolved_values(&settings) {
                Output::kv(key, &value);
            }
        }

        ConfigAction::Edit => {
            if !config_path.exists() {
                settings.save_to(&config_path)?;
                Output::info(&format!("Created default config at {}", config_path.display()));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            match std::process::Command::new(&editor).arg(&config_path).status() {
                Ok(s) if s.success() => report_edited(&config_path),
                Ok(_) => Output::warning("Editor exited with non-zero status."),
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Re-read the edited file so a broken config is reported now, not on the next generate.
fn report_edited(config_path: &Path) {
    match Settings::load_from(Some(&config_path.to_path_buf())) {
        Ok(_) => Output::success("Config saved."),
        Err(e) => {
            Output::error(&format!("Config saved but does not parse: {}", e));
            Output::info(&format!(
                "Fix it with: scriptcast config edit ({})",
                config_path.display()
            ));
        }
    }
}

/// Values derived from the settings and the environment.
fn resolved_values(settings: &Settings) -> Vec<(&'static str, String)> {
    let api_key = match settings.model.api_key() {
        Ok(key) => format!("{} = {}", settings.model.api_key_env, mask_secret(&key)),
        Err(_) => format!("{} (not set)", settings.model.api_key_env),
    };

    let prompts = match &settings.prompts.custom_dir {
        Some(dir) => Settings::expand_path(dir).display().to_string(),
        None => "built-in".to_string(),
    };

    vec![
        ("API key", api_key),
        ("Output directory", settings.output_dir().display().to_string()),
        ("Prompts", prompts),
        (
            "Web search",
            if settings.search.enabled { "enabled" } else { "disabled" }.to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_values_without_key() {
        let mut settings = Settings::default();
        settings.model.api_key_env = "SCRIPTCAST_TEST_CONFIG_KEY_UNSET".to_string();
        settings.search.enabled = false;

        let values = resolved_values(&settings);
        assert_eq!(values[0].1, "SCRIPTCAST_TEST_CONFIG_KEY_UNSET (not set)");
        assert_eq!(values[2].1, "built-in");
        assert_eq!(values[3].1, "disabled");
    }

    #[test]
    fn test_edit_path_writes_defaults_to_custom_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        std::env::set_var("EDITOR", "true");
        run_config(&ConfigAction::Edit, Settings::default(), Some(path.clone())).unwrap();

        assert!(path.exists());
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.model.id, Settings::default().model.id);
    }
}
