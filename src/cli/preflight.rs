//! Pre-flight checks before remote operations.
//!
//! Hard failures stop the command. Missing credentials are only warned
//! about: the pipeline reports them as an unavailable agent.

use crate::config::Settings;
use crate::error::{Result, ScriptcastError};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Generating needs a usable output directory when saving.
    Generate,
    /// The server starts without credentials and reports them as status.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// `output_dir` is the directory the run will write to, if it saves at all.
/// Returns warnings to show the user, or an error for a check that failed.
pub fn check(
    operation: Operation,
    settings: &Settings,
    output_dir: Option<&Path>,
) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    match operation {
        Operation::Generate => {
            if let Err(e) = settings.model.api_key() {
                warnings.push(e.to_string());
            }
            if let Some(dir) = output_dir {
                check_output_dir(dir)?;
            }
        }
        Operation::Serve => {}
    }
    Ok(warnings)
}

/// The output directory must be a directory if it already exists.
fn check_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScriptcastError::Config(format!(
            "Output path {} exists and is not a directory",
            dir.display()
        )));
    }
    Ok(())
}
