// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::Shell;

/// One group of commands as read from a TOML file.
///
/// ```toml
/// name = "dev"
/// shell = "bash"
/// description = "api + database"
///
/// [[command]]
/// name = "db"
/// command = "docker compose up db"
/// ready_regexp = "ready to accept connections"
///
/// [[command]]
/// name = "api"
/// command = "cargo run"
/// directory = "~/src/api"
/// depends_on = ["db"]
///
/// [command.environment]
/// RUST_LOG = "debug"
/// ```
///
/// This is the unchecked form; [`GroupConfig`] is what the rest of the
/// crate consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGroupConfig {
    pub name: String,

    /// Shell for every command in the group. Defaults to `sh`.
    #[serde(default)]
    pub shell: Shell,

    /// One-line summary shown by `list`.
    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "command")]
    pub commands: Vec<CommandConfig>,
}

/// `[[command]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Empty or missing means anonymous: output is not prefixed.
    #[serde(default)]
    pub name: String,

    pub command: String,

    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default)]
    pub silence: bool,

    #[serde(default)]
    pub ready_regexp: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// A group config that passed validation.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub name: String,
    pub shell: Shell,
    pub description: String,
    pub commands: Vec<CommandConfig>,
}

impl GroupConfig {
    /// Construct without validation. Prefer `GroupConfig::try_from(raw)`.
    pub(crate) fn new_unchecked(raw: RawGroupConfig) -> Self {
        Self {
            name: raw.name,
            shell: raw.shell,
            description: raw.description,
            commands: raw.commands,
        }
    }
}
