// src/group/scheduler.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::{CmdGroupError, Result};
use crate::exec::ProcessUnit;
use crate::group::CancelToken;
use crate::group::worker::{build_index, run_worker};
use crate::sync::lock;

/// How often a waiting worker re-checks its dependencies.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Default)]
struct GroupState {
    started: bool,
    units: Vec<Arc<ProcessUnit>>,
}

/// A set of commands run together, each started once the commands it
/// depends on are ready.
///
/// A group runs once; adding commands or running again after
/// [`Group::run`] fails with [`CmdGroupError::AlreadyStarted`].
#[derive(Debug)]
pub struct Group {
    state: Mutex<GroupState>,
    poll_interval: Duration,
}

impl Group {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GroupState::default()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Build a group from an initial set of units.
    pub fn from_units(units: impl IntoIterator<Item = ProcessUnit>) -> Result<Self> {
        let group = Self::new();
        group.add_commands(units)?;
        Ok(group)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Append units to the group.
    ///
    /// Non-empty names must be unique across the whole group.
    pub fn add_commands(&self, units: impl IntoIterator<Item = ProcessUnit>) -> Result<()> {
        let mut state = lock(&self.state);
        if state.started {
            return Err(CmdGroupError::AlreadyStarted);
        }

        let mut seen: HashSet<String> = state
            .units
            .iter()
            .map(|u| u.name().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        let mut added = Vec::new();
        for unit in units {
            if !unit.name().is_empty() && !seen.insert(unit.name().to_string()) {
                return Err(CmdGroupError::DuplicateName(unit.name().to_string()));
            }
            added.push(Arc::new(unit));
        }

        state.units.extend(added);
        Ok(())
    }

    pub fn len(&self) -> usize {
        lock(&self.state).units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the group's commands, in insertion order.
    pub fn names(&self) -> Vec<String> {
        lock(&self.state)
            .units
            .iter()
            .map(|u| u.name().to_string())
            .collect()
    }

    /// Run every command and wait for all of them to finish.
    ///
    /// Each command gets its own worker that waits for its dependencies and
    /// then runs it. The first error from any worker cancels the rest and
    /// interrupts every running command; that first error is what this
    /// returns. If `cancel` fires, the same interruption happens and
    /// [`CmdGroupError::Cancelled`] is returned.
    pub async fn run(&self, cancel: &CancelToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(CmdGroupError::Cancelled);
        }

        let units = {
            let mut state = lock(&self.state);
            if state.started {
                return Err(CmdGroupError::AlreadyStarted);
            }
            state.started = true;
            state.units.clone()
        };

        info!(commands = units.len(), "starting command group");

        let index = Arc::new(build_index(&units));
        let scope = cancel.child();

        let supervisor = {
            let scope = scope.clone();
            let units = units.clone();
            tokio::spawn(async move {
                scope.cancelled().await;
                debug!("group cancelled; interrupting all commands");
                interrupt_all(&units);
            })
        };

        let mut workers = JoinSet::new();
        for unit in &units {
            workers.spawn(run_worker(
                Arc::clone(unit),
                Arc::clone(&index),
                scope.clone(),
                self.poll_interval,
            ));
        }

        let mut first_error: Option<CmdGroupError> = None;
        while let Some(joined) = workers.join_next().await {
            let result = joined.unwrap_or_else(|e| Err(anyhow!("command worker failed: {e}").into()));
            let Err(err) = result else {
                continue;
            };

            if first_error.is_none() {
                if !err.is_cancelled() {
                    warn!(error = %err, "command failed; stopping group");
                }
                scope.cancel();
                first_error = Some(err);
            } else {
                debug!(error = %err, "additional error after group stop");
            }
        }

        supervisor.abort();
        // Releases the link between `cancel` and `scope`.
        scope.cancel();

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("all commands finished");
                Ok(())
            }
        }
    }

    /// Run the group, relaying the first SIGINT/SIGTERM received by this
    /// process to every command.
    pub async fn run_until_signal(&self) -> Result<()> {
        let token = CancelToken::new();
        let relay = {
            let token = token.clone();
            tokio::spawn(async move {
                wait_for_shutdown_signal().await;
                info!("shutdown signal received; interrupting commands");
                token.cancel();
            })
        };

        let result = self.run(&token).await;
        relay.abort();
        result
    }

    /// Interrupt every running command. Does nothing before the group starts.
    pub fn send_interrupts(&self) {
        let state = lock(&self.state);
        if !state.started {
            return;
        }
        interrupt_all(&state.units);
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

fn interrupt_all(units: &[Arc<ProcessUnit>]) {
    for unit in units {
        if let Err(err) = unit.interrupt() {
            warn!(command = %unit.name(), error = %err, "failed to interrupt command");
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to listen for SIGTERM");
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            return;
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for Ctrl+C");
                term.recv().await;
            }
        }
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
