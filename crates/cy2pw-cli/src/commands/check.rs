//! Parse check with a source report on failure

use super::read_source;
use anyhow::Result;
use cy2pw::ConvertError;
use cy2pw::config::Config;
use std::path::Path;

/// Returns whether `file` parses.
pub fn run(config: &Config, file: &Path) -> Result<bool> {
    let source = read_source(config, file)?;
    match cy2pw::parser::parse(&source) {
        Ok(program) => {
            eprintln!("Parse OK: {} top-level statements", program.body.len());
            Ok(true)
        }
        Err(errors) => {
            let name = file.display().to_string();
            for error in &errors {
                eprint!("{}", ConvertError::from_parse_error(error, &source).report(&name, &source));
            }
            Ok(false)
        }
    }
}
