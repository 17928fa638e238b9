use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::{args::CommonArgs, report::print_message_warnings};
use crate::{
    config::{Config, load_config},
    core::{TranslationKeyMap, parsers::json::scan_message_files},
};

/// Config merged with the shared CLI overrides, plus the directory its
/// relative paths resolve against.
pub struct LoadedConfig {
    pub config: Config,
    pub base_dir: PathBuf,
    pub cwd: PathBuf,
    pub messages_root: PathBuf,
}

impl LoadedConfig {
    /// Resolve a configured path against the config file's directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

pub fn load_with_overrides(common: &CommonArgs) -> Result<LoadedConfig> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let loaded = load_config(&cwd)?;
    let base_dir = loaded.base_dir(&cwd);
    let mut config = loaded.config;

    if !common.locales.is_empty() {
        config.locales = common.locales.clone();
    }

    // Paths given on the command line are relative to the working directory.
    let messages_root = match &common.messages_root {
        Some(path) => cwd.join(path),
        None => base_dir.join(&config.messages_root),
    };

    Ok(LoadedConfig {
        config,
        base_dir,
        cwd,
        messages_root,
    })
}

/// Load every locale file, keeping only the configured locales.
pub fn load_key_map(
    messages_root: &Path,
    locales: &[String],
    verbose: bool,
) -> Result<TranslationKeyMap> {
    let scan = scan_message_files(messages_root)?;
    print_message_warnings(&scan.warnings, verbose);

    let mut key_map = scan.key_map;
    key_map.retain_locales(locales);
    tracing::info!(
        keys = key_map.len(),
        locales = ?scan.locales,
        "loaded translation keys"
    );
    Ok(key_map)
}
