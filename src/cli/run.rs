//! Command dispatch.
//!
//! `inject` runs with a Ctrl-C listener: the first interrupt stops new files
//! from being started while files already in flight finish writing; a second
//! interrupt exits immediately.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{generate::generate, init::init, inject::inject},
    exit_status::ExitStatus,
};

pub fn run(Arguments { command, .. }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Inject(cmd)) => inject(cmd, spawn_interrupt_listener()),
        Some(Command::Generate(cmd)) => generate(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}

/// Set the returned flag on Ctrl-C.
///
/// The listener lives on its own thread with a single-threaded runtime; if
/// the runtime cannot be built the flag is simply never set.
fn spawn_interrupt_listener() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let spawned = thread::Builder::new()
        .name("skiver-signal".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::debug!(error = %e, "no signal runtime, Ctrl-C will not be handled");
                    return;
                }
            };
            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                tracing::warn!("interrupt received, finishing files in progress");
                flag.store(true, Ordering::SeqCst);
            }
            // A second interrupt aborts without waiting.
            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                std::process::exit(130);
            }
        });

    if let Err(e) = spawned {
        tracing::debug!(error = %e, "failed to spawn signal listener");
    }

    cancel
}
