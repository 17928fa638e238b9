use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::{exit_status::ExitStatus, report::SUCCESS_MARK};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init() -> Result<ExitStatus> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    init_in(&cwd)
}

/// Write the default config into `dir`, refusing to overwrite.
fn init_in(dir: &Path) -> Result<ExitStatus> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!(
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        );
        return Ok(ExitStatus::Failure);
    }

    let mut json = default_config_json()?;
    json.push('\n');
    fs::write(&config_path, json)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    tracing::info!(path = %config_path.display(), "created config");

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );

    Ok(ExitStatus::Success)
}
