//! Converts one file to stdout

use super::read_source;
use anyhow::{Result, anyhow};
use cy2pw::Reprinter;
use cy2pw::config::Config;
use std::path::Path;

pub fn run(config: &Config, file: &Path) -> Result<()> {
    let source = read_source(config, file)?;
    let output = cy2pw::convert_with(&source, &Reprinter::new(config.print))
        .map_err(|error| anyhow!("{}", error.report(&file.display().to_string(), &source)))?;
    print!("{output}");
    Ok(())
}
