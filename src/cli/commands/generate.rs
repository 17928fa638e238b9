use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::{args::GenerateCommand, exit_status::ExitStatus, report::SUCCESS_MARK};
use super::helper::{load_key_map, load_with_overrides};
use crate::core::{generate::render_identifier_module, injector::write_atomic};

pub fn generate(cmd: GenerateCommand) -> Result<ExitStatus> {
    let loaded = load_with_overrides(&cmd.common)?;
    let key_map = load_key_map(
        &loaded.messages_root,
        &loaded.config.locales,
        cmd.common.verbose,
    )?;

    let module = render_identifier_module(&key_map, &loaded.config.identifier_alias);

    for key in &module.skipped {
        eprintln!(
            "{} key \"{}\" is also a prefix of other keys and was left out",
            "warning:".bold().yellow(),
            key
        );
    }

    let target: Option<PathBuf> = match (&cmd.path, &loaded.config.generate_path) {
        (Some(path), _) => Some(loaded.cwd.join(path)),
        (None, Some(path)) => Some(loaded.resolve(path)),
        (None, None) => None,
    };

    let Some(target) = target else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(module.source.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(ExitStatus::Success);
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    write_atomic(&target, &module.source)?;

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Generated {} with {} {}",
            target.display(),
            module.key_count,
            if module.key_count == 1 { "key" } else { "keys" }
        )
        .green()
    );

    Ok(ExitStatus::Success)
}
