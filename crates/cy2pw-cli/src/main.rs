mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cy2pw::config::{Config, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cy2pw")]
#[command(about = "Convert Cypress tests to Playwright tests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file, `cy2pw.toml` in the current directory is used when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every Cypress test file under a directory
    Convert {
        /// Directory with the Cypress test files
        input: PathBuf,

        /// Directory the Playwright test files are written to
        output: PathBuf,

        /// Only convert files whose relative path matches this regex
        #[arg(long)]
        filter: Option<String>,

        /// Print one JSON status line per file
        #[arg(long)]
        json: bool,
    },

    /// Convert one file and print the result
    Print {
        /// Path to the Cypress test file
        file: PathBuf,
    },

    /// Check that a file parses
    Check {
        /// Path to the Cypress test file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(log::LevelFilter::Info);
    }
    logger.init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            filter,
            json,
        } => {
            let summary = commands::convert::run(&config, &input, &output, filter.as_deref(), json)?;
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Print { file } => {
            commands::print::run(&config, &file)?;
        }

        Commands::Check { file } => {
            if !commands::check::run(&config, &file)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            log::debug!("Using {DEFAULT_CONFIG_FILE}");
            Config::load(Path::new(DEFAULT_CONFIG_FILE)).context("Failed to load the default config")
        }
        None => Ok(Config::default()),
    }
}
