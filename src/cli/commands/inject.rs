use std::{
    sync::{Arc, atomic::AtomicBool},
    time::Duration,
};

use anyhow::{Context, Result};

use super::super::{args::InjectCommand, exit_status::ExitStatus, report::print_inject};
use super::helper::{LoadedConfig, load_key_map, load_with_overrides};
use crate::core::{RunContext, inject_directory};

pub fn inject(cmd: InjectCommand, cancel: Arc<AtomicBool>) -> Result<ExitStatus> {
    let loaded = load_with_overrides(&cmd.common)?;
    let ctx = build_context(&cmd, &loaded, cancel)?;

    let key_map = load_key_map(
        &loaded.messages_root,
        &loaded.config.locales,
        cmd.common.verbose,
    )?;

    let summary = inject_directory(ctx, Arc::new(key_map)).context("Injection failed")?;
    print_inject(&summary);

    if summary.cancelled || (summary.dry_run && summary.files_changed > 0) {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

/// Merge config and CLI flags into the run context. Flags win.
fn build_context(
    cmd: &InjectCommand,
    loaded: &LoadedConfig,
    cancel: Arc<AtomicBool>,
) -> Result<RunContext> {
    let config = &loaded.config;

    let root = match &cmd.dir {
        Some(dir) => loaded.cwd.join(dir),
        None => loaded.resolve(&config.source_root),
    };
    let mode = cmd.mode.unwrap_or(config.mode);

    let mut ctx = RunContext::new(&root, mode)?;
    ctx.dry_run = cmd.dry_run || config.dry_run;
    ctx.extensions = if cmd.extensions.is_empty() {
        config.extensions.clone()
    } else {
        cmd.extensions.clone()
    };
    ctx.ignores = config
        .ignores
        .iter()
        .chain(cmd.ignores.iter())
        .cloned()
        .collect();
    ctx.on_replace = cmd.on_replace.clone().or_else(|| config.on_replace.clone());
    ctx.formatter_timeout =
        Duration::from_secs(cmd.formatter_timeout.unwrap_or(config.formatter_timeout_secs));
    ctx.jobs = cmd.jobs.unwrap_or(config.jobs);
    ctx.identifier_module = config.identifier_module.clone();
    ctx.identifier_alias = config.identifier_alias.clone();
    ctx.cancel = cancel;

    tracing::debug!(?ctx, "run context");
    Ok(ctx)
}
