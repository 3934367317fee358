//! External tool execution with a bounded wait.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::ProbeError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Seam between the prober and the operating system.
pub trait CommandRunner {
    /// Whether `program` can be resolved on PATH.
    fn is_available(&self, program: &str) -> bool;

    /// Run `program` to completion and return its trimmed stdout.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, ProbeError>;
}

/// Runs real processes, killing any that outlive `timeout`.
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        debug!(program, ?args, "running tool");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    ProbeError::ToolMissing {
                        tool: program.to_string(),
                    }
                } else {
                    ProbeError::Launch {
                        tool: program.to_string(),
                        source,
                    }
                }
            })?;

        let deadline = Instant::now() + self.timeout;
        let timed_out = || ProbeError::Timeout {
            tool: program.to_string(),
            timeout: self.timeout,
        };

        // Drain pipes on their own threads so a chatty tool cannot block on a
        // full pipe while we poll for exit.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_until(&mut child, deadline).map_err(|e| match e {
            WaitError::TimedOut => timed_out(),
            WaitError::Io(source) => ProbeError::Launch {
                tool: program.to_string(),
                source,
            },
        })?;

        // A descendant that inherited the pipes keeps them open after the
        // child exits; the deadline covers the drain as well.
        let stdout = collect(&stdout, deadline).ok_or_else(timed_out)?;
        let stderr = collect(&stderr, deadline).unwrap_or_default();

        if !status.success() {
            return Err(ProbeError::ToolFailed {
                tool: program.to_string(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout.trim().to_string())
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect(rx: &Receiver<String>, deadline: Instant) -> Option<String> {
    rx.recv_timeout(deadline.saturating_duration_since(Instant::now())).ok()
}

enum WaitError {
    TimedOut,
    Io(std::io::Error),
}

fn wait_until(child: &mut Child, deadline: Instant) -> Result<std::process::ExitStatus, WaitError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WaitError::TimedOut);
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(WaitError::Io(e)),
        }
    }
}
