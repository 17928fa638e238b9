//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `inject`: Annotate or rewrite translation key usages in a source tree
//! - `generate`: Write the identifier module used by identifier mode
//! - `init`: Initialize skiver configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::core::InjectMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Inject(cmd)) => cmd.common.verbose,
            Some(Command::Generate(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Logging flags, accepted before or after the subcommand.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, env = "SKIVER_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

/// Arguments shared by commands that read the message files.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Messages directory path (overrides config file)
    #[arg(long)]
    pub messages_root: Option<PathBuf>,

    /// Only use these locales (repeatable; overrides config file)
    #[arg(long = "locale")]
    pub locales: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct InjectCommand {
    /// Directory to process (defaults to the configured source root)
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Injection mode (overrides config file)
    #[arg(long, value_enum)]
    pub mode: Option<InjectMode>,

    /// Compute changes without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Command run on every rewritten file, with the file path appended
    #[arg(long, value_name = "CMD")]
    pub on_replace: Option<String>,

    /// Glob pattern or path to skip (repeatable; adds to config file)
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignores: Vec<String>,

    /// File extension to process (repeatable; overrides config file)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Maximum number of worker threads (0 = number of CPUs)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Seconds to wait for the on-replace command before killing it
    #[arg(long, value_name = "SECS")]
    pub formatter_timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Output file (defaults to the configured generatePath, else stdout)
    #[arg(long)]
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Annotate or rewrite translation key usages in source files
    Inject(InjectCommand),
    /// Generate the identifier module from the message files
    Generate(GenerateCommand),
    /// Initialize a new .skiverrc.json configuration file
    Init,
}
