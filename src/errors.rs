// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Errors fall into four groups:
//! - configuration errors, raised while building a [`ProcessUnit`] or loading
//!   a config file, before any process is spawned;
//! - graph errors, raised lazily by a worker the first time it inspects its
//!   dependencies;
//! - execution errors, raised when a command fails to spawn or exits
//!   unsuccessfully;
//! - cancellation, which is kept apart from the others so callers can tell
//!   "interrupted" from "failed".
//!
//! [`ProcessUnit`]: crate::exec::ProcessUnit

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdGroupError {
    #[error("{0:?} shell not supported. Use zsh|bash|sh")]
    UnsupportedShell(String),

    #[error("directory {dir:?} does not exist")]
    MissingDirectory { dir: PathBuf },

    #[error("expanding directory {dir:?}: {reason}")]
    DirectoryExpansion { dir: String, reason: String },

    #[error("compiling regexp {pattern:?}: {source}")]
    InvalidReadyPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("duplicate command name {0:?}")]
    DuplicateName(String),

    #[error("group has already been started")]
    AlreadyStarted,

    #[error("{command:?} depends-on {dependency:?}, but {dependency:?} does not exist")]
    MissingDependency { command: String, dependency: String },

    #[error("{command} depends on itself")]
    SelfDependency { command: String },

    #[error("failed to start command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("waiting for command: {0}")]
    Wait(#[source] std::io::Error),

    #[error("exit status {code}")]
    ExitStatus { code: i32 },

    #[error("signal: {signal}")]
    Signaled { signal: String },

    #[error("sending interrupt to {name}: {source}")]
    Interrupt {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{name}: {source}")]
    Command {
        name: String,
        #[source]
        source: Box<CmdGroupError>,
    },

    #[error("Cycle detected in command graph: {0}")]
    DependencyCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CmdGroupError {
    /// Wrap `self` with the name of the command it came from.
    ///
    /// Cancellation is returned as-is so it stays recognisable.
    pub fn for_command(self, name: &str) -> Self {
        match self {
            CmdGroupError::Cancelled => CmdGroupError::Cancelled,
            other => CmdGroupError::Command {
                name: name.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// True if this error (or the error it wraps) is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            CmdGroupError::Cancelled => true,
            CmdGroupError::Command { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Innermost error, skipping any `Command` wrappers.
    pub fn root(&self) -> &CmdGroupError {
        match self {
            CmdGroupError::Command { source, .. } => source.root(),
            other => other,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CmdGroupError>;
