//! Directory conversion

use super::read_source;
use anyhow::{Context, Result};
use cy2pw::config::Config;
use cy2pw::transform::FIXME_PREFIX;
use cy2pw::{ConvertError, Reprinter};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
    /// Placeholder calls across all converted files.
    pub placeholders: usize,
}

/// One `--json` line.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum FileStatus<'a> {
    Converted {
        input: &'a str,
        output: &'a str,
        placeholders: usize,
    },
    Failed {
        input: &'a str,
        error: &'a ConvertError,
    },
}

pub fn run(config: &Config, input: &Path, output: &Path, filter: Option<&str>, json: bool) -> Result<Summary> {
    let filter = filter
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter regex")?;
    let formatter = Reprinter::new(config.print);
    let mut summary = Summary::default();

    for (path, relative) in source_files(config, input, filter.as_ref())? {
        let source = read_source(config, &path)?;
        let relative_name = relative.display().to_string();
        match cy2pw::convert_with(&source, &formatter) {
            Ok(converted) => {
                let target = output.join(target_path(config, &relative));
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&target, &converted).with_context(|| format!("Failed to write {}", target.display()))?;

                let placeholders = converted.matches(FIXME_PREFIX).count();
                summary.converted += 1;
                summary.placeholders += placeholders;
                if json {
                    let target_name = target.display().to_string();
                    print_status(&FileStatus::Converted {
                        input: &relative_name,
                        output: &target_name,
                        placeholders,
                    })?;
                } else if placeholders > 0 {
                    log::warn!("{relative_name}: {placeholders} placeholder(s) need manual work");
                } else {
                    log::debug!("{relative_name}: converted");
                }
            }
            Err(error) => {
                summary.failed += 1;
                if json {
                    print_status(&FileStatus::Failed {
                        input: &relative_name,
                        error: &error,
                    })?;
                } else {
                    log::error!("{}", error.report(&relative_name, &source));
                }
            }
        }
    }

    log::info!(
        "Converted {} file(s), {} failed, {} placeholder(s)",
        summary.converted,
        summary.failed,
        summary.placeholders
    );
    Ok(summary)
}

/// Source files under `input` with their path relative to it, sorted by name.
fn source_files(config: &Config, input: &Path, filter: Option<&Regex>) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
        if !entry.file_type().is_file() || !config.is_source_file(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let relative = entry.path().strip_prefix(input).unwrap_or(entry.path()).to_path_buf();
        if filter.is_some_and(|filter| !filter.is_match(&relative.to_string_lossy())) {
            continue;
        }
        files.push((entry.into_path(), relative));
    }
    Ok(files)
}

/// `cart/checkout.cy.js` -> `cart/checkout.spec.ts`
fn target_path(config: &Config, relative: &Path) -> PathBuf {
    let file_name = relative.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    relative.with_file_name(config.target_file_name(&file_name))
}

fn print_status(status: &FileStatus<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(status).context("Failed to serialize status")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path() {
        let config = Config::default();
        assert_eq!(
            target_path(&config, Path::new("cart/checkout.cy.js")),
            PathBuf::from("cart/checkout.spec.ts")
        );
    }

    #[test]
    fn test_status_line() {
        let line = serde_json::to_string(&FileStatus::Converted {
            input: "a.cy.js",
            output: "out/a.spec.ts",
            placeholders: 2,
        })
        .unwrap();
        assert_eq!(
            line,
            r#"{"status":"converted","input":"a.cy.js","output":"out/a.spec.ts","placeholders":2}"#
        );
    }
}
