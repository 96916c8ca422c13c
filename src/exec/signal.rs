// src/exec/signal.rs

//! Signal delivery to a command's whole process tree.
//!
//! On unix every command is spawned as the leader of its own process group,
//! so signalling the group reaches the shell and everything it started.
//! Elsewhere there are no process groups; the tree is killed instead.

use std::io;
use std::process::ExitStatus;

use tokio::process::Command;

/// Arrange for the spawned child to lead a fresh process group.
#[cfg(unix)]
pub fn isolate(cmd: &mut Command) {
    cmd.process_group(0);
}

#[cfg(not(unix))]
pub fn isolate(_cmd: &mut Command) {}

/// Send SIGINT to the process group led by `pid`.
#[cfg(unix)]
pub fn interrupt_tree(pid: u32) -> io::Result<()> {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    killpg(Pid::from_raw(pid), Signal::SIGINT).map_err(io::Error::from)
}

/// Kill the process tree rooted at `pid`.
#[cfg(not(unix))]
pub fn interrupt_tree(pid: u32) -> io::Result<()> {
    use std::process::Stdio;

    let status = std::process::Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("taskkill exited with {status}")))
    }
}

/// Name of the signal that terminated a process, if any.
#[cfg(unix)]
pub fn terminating_signal(status: &ExitStatus) -> Option<String> {
    use nix::sys::signal::Signal;
    use std::os::unix::process::ExitStatusExt;

    status.signal().map(|raw| match Signal::try_from(raw) {
        Ok(sig) => sig.as_str().to_string(),
        Err(_) => raw.to_string(),
    })
}

#[cfg(not(unix))]
pub fn terminating_signal(_status: &ExitStatus) -> Option<String> {
    None
}
