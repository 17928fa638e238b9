//! The on-replace hook: an external command run on every rewritten file.

use std::{
    io::Read,
    path::Path,
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

use crate::core::error::{InjectError, InjectResult};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterHook {
    command: String,
    timeout: Duration,
}

impl FormatterHook {
    /// `None` for a blank command.
    pub fn new(command: &str, timeout: Duration) -> Option<Self> {
        let command = command.trim();
        if command.is_empty() {
            return None;
        }
        Some(Self {
            command: command.to_string(),
            timeout,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the command through the shell with `file` as its last argument.
    ///
    /// The child is killed once the timeout expires. Output is captured and
    /// attached to the error; on success it is only logged.
    pub fn run(&self, file: &Path) -> InjectResult<()> {
        let mut child = self
            .spawn(file)
            .map_err(|e| self.failure(file, e.to_string(), String::new()))?;

        // A full pipe would block the child while we poll it.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = self.wait(&mut child, file)?;
        let output = [stdout, stderr]
            .into_iter()
            .flatten()
            .filter_map(|handle| handle.join().ok())
            .collect::<Vec<_>>()
            .join("");

        if status.success() {
            tracing::debug!(command = %self.command, file = %file.display(), "formatter finished");
            return Ok(());
        }

        let reason = match status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(self.failure(file, reason, output))
    }

    #[cfg(windows)]
    fn shell(&self, file: &Path) -> Command {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(&self.command).arg(file);
        command
    }

    #[cfg(not(windows))]
    fn shell(&self, file: &Path) -> Command {
        // "$1" keeps the path out of shell parsing.
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(format!("{} \"$1\"", self.command))
            .arg("skiver")
            .arg(file);
        #[cfg(unix)]
        command.process_group(0);
        command
    }

    fn spawn(&self, file: &Path) -> std::io::Result<Child> {
        self.shell(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }

    fn wait(&self, child: &mut Child, file: &Path) -> InjectResult<std::process::ExitStatus> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if started.elapsed() >= self.timeout => {
                    kill_tree(child);
                    return Err(InjectError::Timeout {
                        command: self.command.clone(),
                        path: file.to_path_buf(),
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(self.failure(file, e.to_string(), String::new())),
            }
        }
    }

    fn failure(&self, file: &Path, reason: String, output: String) -> InjectError {
        InjectError::ExternalCommand {
            command: self.command.clone(),
            path: file.to_path_buf(),
            reason,
            output,
        }
    }
}

/// Kill the child and, on unix, everything it started. The shell runs in
/// its own process group, so the group id is the child's pid.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: kill(2) takes no pointers; a stale group id only yields ESRCH.
        unsafe {
            libc::kill(-pid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}
