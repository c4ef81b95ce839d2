pub mod check;
pub mod convert;
pub mod print;

use anyhow::{Context, Result};
use cy2pw::config::Config;
use std::fs;
use std::path::Path;

/// Reads `path` and drops the lines the config strips before conversion.
fn read_source(config: &Config, path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(config.prepare_source(&source))
}
