//! CLI module for Scriptcast.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Scriptcast - Research & Script Generator
///
/// Researches a topic with a web-searching AI agent, then turns the research
/// into a YouTube script. Both are saved as markdown.
#[derive(Parser, Debug)]
#[command(name = "scriptcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a topic and generate a script from the research
    Generate {
        /// The research topic (e.g., "why govt. should not print more money")
        topic: String,

        /// Directory for research.md and youtube_script.md (default: general.output_dir)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the results without writing files
        #[arg(long)]
        no_save: bool,
    },

    /// Start the web UI and HTTP API
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8501")]
        port: u16,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

/// Log filter for the crate: `-v` flags win over the configured level.
pub fn log_filter(verbose: u8, configured: &str) -> String {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("scriptcast={}", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from(["scriptcast", "-vv", "generate", "tidal power", "-o", "out"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate { topic, output, no_save } => {
                assert_eq!(topic, "tidal power");
                assert_eq!(output.as_deref(), Some("out"));
                assert!(!no_save);
            }
            other => panic!("Expected generate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::parse_from(["scriptcast", "serve"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8501);
            }
            other => panic!("Expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_log_filter_prefers_flags() {
        assert_eq!(log_filter(0, "error"), "scriptcast=error");
        assert_eq!(log_filter(1, "error"), "scriptcast=info");
        assert_eq!(log_filter(5, "warn"), "scriptcast=trace");
    }
}
