// src/exec/unit.rs

//! A single shell command and its OS process.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{CmdGroupError, Result};
use crate::exec::signal;
use crate::exec::spec::CommandSpec;
use crate::group::CancelToken;
use crate::sync::lock;
use crate::output::{Label, OutputSink};
use crate::types::Shell;

type OutputStream = Pin<Box<dyn AsyncRead + Send>>;

const READ_CHUNK: usize = 8 * 1024;

/// How long a cancelled run waits for its interrupted process to exit.
const INTERRUPT_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessState {
    NotStarted,
    Running { pid: u32 },
    Exited,
}

/// One command of a group, wrapping at most one OS process.
///
/// The unit is *ready* once its output matched its ready pattern or once
/// [`ProcessUnit::run`] returned, whichever happens first. Readiness never
/// goes back to false.
#[derive(Debug)]
pub struct ProcessUnit {
    name: String,
    shell: Shell,
    command: String,
    directory: Option<PathBuf>,
    environment: BTreeMap<String, String>,
    silent: bool,
    ready_pattern: Option<Regex>,
    depends_on: Vec<String>,
    label: Label,
    sink: OutputSink,
    ready: AtomicBool,
    state: Mutex<ProcessState>,
}

impl ProcessUnit {
    /// Build a unit, checking its directory and ready pattern up front.
    pub fn new(spec: CommandSpec, sink: OutputSink) -> Result<Self> {
        let resolved = spec.resolve()?;
        let label = Label::new(&spec.name, spec.color);

        Ok(Self {
            name: spec.name,
            shell: spec.shell,
            command: spec.command,
            directory: resolved.directory,
            environment: spec.environment,
            silent: spec.silent,
            ready_pattern: resolved.ready_pattern,
            depends_on: spec.depends_on,
            label,
            sink,
            ready: AtomicBool::new(false),
            state: Mutex::new(ProcessState::NotStarted),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Spawn the command and wait for it to exit, or for `cancel` to fire.
    ///
    /// On cancellation the process group is interrupted, the process gets a
    /// short grace period to exit, and [`CmdGroupError::Cancelled`] is
    /// returned either way. A non-zero exit becomes
    /// [`CmdGroupError::ExitStatus`]. Whatever the outcome, the unit is ready
    /// once this returns.
    pub async fn run(&self, cancel: &CancelToken) -> Result<()> {
        let _ready = ReadyOnReturn(&self.ready);

        let already_started = *lock(&self.state) != ProcessState::NotStarted;
        if already_started {
            return Err(CmdGroupError::AlreadyStarted);
        }

        let mut cmd = Command::new(self.shell.program());
        cmd.arg("-c")
            .arg(&self.command)
            .envs(&self.environment)
            .stdin(Stdio::null());
        if let Some(dir) = &self.directory {
            cmd.current_dir(dir);
        }
        signal::isolate(&mut cmd);
        let combined = attach_output(&mut cmd).map_err(CmdGroupError::Spawn)?;

        let mut child = cmd.spawn().map_err(CmdGroupError::Spawn)?;
        // The command keeps the write end of the output pipe alive until dropped.
        drop(cmd);

        let (primary, secondary) = match combined {
            Some(stream) => (Some(stream), None),
            None => (
                child.stdout.take().map(|s| Box::pin(s) as OutputStream),
                child.stderr.take().map(|s| Box::pin(s) as OutputStream),
            ),
        };

        match child.id() {
            Some(pid) => {
                *lock(&self.state) = ProcessState::Running { pid };
                info!(command = %self.name, pid, shell = %self.shell, "started command process");
            }
            None => *lock(&self.state) = ProcessState::Exited,
        }

        let finished = async {
            let (status, (), ()) = tokio::join!(
                async {
                    let status = child.wait().await;
                    *lock(&self.state) = ProcessState::Exited;
                    status
                },
                self.pump(primary),
                self.pump(secondary),
            );
            status
        };
        tokio::pin!(finished);

        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            status = &mut finished => Some(status),
        };

        match status {
            Some(status) => {
                let status = status.map_err(CmdGroupError::Wait)?;
                self.exit_result(status)
            }
            None => {
                debug!(command = %self.name, "cancelled while running; interrupting");
                if let Err(err) = self.interrupt() {
                    warn!(command = %self.name, error = %err, "failed to interrupt command");
                }
                if tokio::time::timeout(INTERRUPT_GRACE, &mut finished).await.is_err() {
                    warn!(
                        command = %self.name,
                        grace_ms = INTERRUPT_GRACE.as_millis() as u64,
                        "command still running after interrupt; leaving it behind"
                    );
                }
                Err(CmdGroupError::Cancelled)
            }
        }
    }

    /// Send an interrupt to the unit's process group.
    ///
    /// Every call while the process is running sends a signal, so a command
    /// that traps the first SIGINT can still be reached. Does nothing before
    /// start or after exit.
    pub fn interrupt(&self) -> Result<()> {
        let state = lock(&self.state);
        if let ProcessState::Running { pid } = *state {
            debug!(command = %self.name, pid, "sending interrupt to process group");
            signal::interrupt_tree(pid).map_err(|source| CmdGroupError::Interrupt {
                name: self.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Handle one chunk of the process's combined stdout/stderr.
    ///
    /// A ready-pattern match marks the unit ready. The pattern is matched
    /// against this chunk alone, so a match split across two chunks is not
    /// seen. Returns the full chunk length even when the output is silenced.
    pub fn write(&self, chunk: &[u8]) -> io::Result<usize> {
        let matched = self
            .ready_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(chunk));

        let written = if self.silent {
            Ok(())
        } else {
            self.sink.write_chunk(self.label.as_deref(), chunk)
        };

        if matched && !self.ready.swap(true, Ordering::AcqRel) {
            debug!(command = %self.name, "output matched ready pattern");
        }

        written.map(|()| chunk.len())
    }

    async fn pump(&self, stream: Option<OutputStream>) {
        let Some(mut stream) = stream else {
            return;
        };
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if let Err(err) = self.write(&buf[..n]) {
                        warn!(command = %self.name, error = %err, "failed to write command output");
                    }
                }
                Err(err) => {
                    debug!(command = %self.name, error = %err, "output stream closed");
                    break;
                }
            }
        }
    }

    fn exit_result(&self, status: ExitStatus) -> Result<()> {
        info!(
            command = %self.name,
            exit_code = status.code(),
            success = status.success(),
            "command process exited"
        );

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(CmdGroupError::ExitStatus { code }),
            None => Err(CmdGroupError::Signaled {
                signal: signal::terminating_signal(&status)
                    .unwrap_or_else(|| "unknown".to_string()),
            }),
        }
    }
}

struct ReadyOnReturn<'a>(&'a AtomicBool);

impl Drop for ReadyOnReturn<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Route stdout and stderr into one pipe so their chunks arrive in the order
/// the process wrote them.
#[cfg(unix)]
fn attach_output(cmd: &mut Command) -> io::Result<Option<OutputStream>> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let (reader, writer) = io::pipe()?;
    let writer_err = writer.try_clone()?;
    cmd.stdout(writer).stderr(writer_err);

    let receiver = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    Ok(Some(Box::pin(receiver)))
}

/// Without unix pipes, stdout and stderr are read as two separate streams.
#[cfg(not(unix))]
fn attach_output(cmd: &mut Command) -> io::Result<Option<OutputStream>> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    Ok(None)
}
