// src/exec/spec.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use anstyle::Style;
use regex::bytes::Regex;

use crate::errors::{CmdGroupError, Result};
use crate::types::Shell;

/// Everything needed to build a [`ProcessUnit`](crate::exec::ProcessUnit).
///
/// This is plain data; nothing is checked until
/// [`CommandSpec::resolve`] runs (which `ProcessUnit::new` does for you).
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// Identity used for output prefixes and `depends_on` lookups.
    ///
    /// Empty means anonymous: no prefix, and not addressable as a dependency.
    pub name: String,
    pub shell: Shell,
    pub command: String,
    /// Working directory. `~` and `$VARS` are expanded.
    pub directory: Option<String>,
    /// Variables set on top of the inherited environment.
    pub environment: BTreeMap<String, String>,
    /// Discard output (readiness detection still runs).
    pub silent: bool,
    /// Regex that marks the command ready when it matches an output chunk.
    pub ready_pattern: Option<String>,
    pub depends_on: Vec<String>,
    /// Label colour; `None` prints the bare name.
    pub color: Option<Style>,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Validate and expand into the form a `ProcessUnit` runs from.
    pub(crate) fn resolve(&self) -> Result<ResolvedSpec> {
        let directory = match &self.directory {
            Some(dir) => Some(resolve_directory(dir)?),
            None => None,
        };

        let ready_pattern = match &self.ready_pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                CmdGroupError::InvalidReadyPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(ResolvedSpec {
            directory,
            ready_pattern,
        })
    }
}

/// Parts of a [`CommandSpec`] that need checking before use.
#[derive(Debug)]
pub(crate) struct ResolvedSpec {
    pub directory: Option<PathBuf>,
    pub ready_pattern: Option<Regex>,
}

/// Expand `~` and environment variables, then require the directory to exist.
pub fn resolve_directory(dir: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(dir).map_err(|e| CmdGroupError::DirectoryExpansion {
        dir: dir.to_string(),
        reason: e.to_string(),
    })?;

    let path = PathBuf::from(expanded.as_ref());
    if !path.is_dir() {
        return Err(CmdGroupError::MissingDirectory { dir: path });
    }
    Ok(path)
}
