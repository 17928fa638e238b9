use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{InjectMode, generate::is_identifier};

pub const CONFIG_FILE_NAME: &str = ".skiverrc.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_messages_root", alias = "messagesDir")]
    pub messages_root: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub mode: InjectMode,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub on_replace: Option<String>,
    #[serde(default = "default_formatter_timeout_secs")]
    pub formatter_timeout_secs: u64,
    /// 0 lets the thread pool pick.
    #[serde(default)]
    pub jobs: usize,
    #[serde(default = "default_identifier_module")]
    pub identifier_module: String,
    #[serde(default = "default_identifier_alias")]
    pub identifier_alias: String,
    #[serde(default)]
    pub generate_path: Option<String>,
    /// Locales rendered into annotations; empty means all.
    #[serde(default)]
    pub locales: Vec<String>,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_messages_root() -> String {
    "./messages".to_string()
}

fn default_extensions() -> Vec<String> {
    ["ts", "tsx"].map(String::from).to_vec()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_formatter_timeout_secs() -> u64 {
    30
}

fn default_identifier_module() -> String {
    "tKeys.ts".to_string()
}

fn default_identifier_alias() -> String {
    "tKeys".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            messages_root: default_messages_root(),
            extensions: default_extensions(),
            ignores: default_ignores(),
            mode: InjectMode::default(),
            dry_run: false,
            on_replace: None,
            formatter_timeout_secs: default_formatter_timeout_secs(),
            jobs: 0,
            identifier_module: default_identifier_module(),
            identifier_alias: default_identifier_alias(),
            generate_path: None,
            locales: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        // Patterns without wildcards are literal paths, so [locale] is valid
        // without escaping.
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'ignores': \"{}\"", pattern)
                })?;
            }
        }

        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            bail!("'extensions' must list at least one file extension");
        }

        if !is_identifier(&self.identifier_alias) {
            bail!(
                "'identifierAlias' must be a valid JavaScript identifier, got \"{}\"",
                self.identifier_alias
            );
        }

        if self.identifier_module.trim().is_empty() {
            bail!("'identifierModule' must not be empty");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

/// Walk up from `start_dir` looking for the config file, stopping at the
/// repository root (the first directory containing `.git`).
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config came from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    /// Directory relative paths in the config are resolved against.
    pub fn base_dir(&self, cwd: &Path) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {:?}", path))?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
