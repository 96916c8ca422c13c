// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{GroupConfig, RawGroupConfig};
use crate::errors::{CmdGroupError, Result};

/// Words the CLI uses itself; a group may not be named after one.
pub const RESERVED_NAMES: &[&str] = &["check", "help", "list", "run"];

impl TryFrom<RawGroupConfig> for GroupConfig {
    type Error = CmdGroupError;

    fn try_from(raw: RawGroupConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(GroupConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawGroupConfig) -> Result<()> {
    ensure_named(cfg)?;
    ensure_has_commands(cfg)?;
    validate_commands(cfg)?;
    validate_no_cycles(cfg)?;
    Ok(())
}

fn ensure_named(cfg: &RawGroupConfig) -> Result<()> {
    if cfg.name.trim().is_empty() {
        return Err(CmdGroupError::ConfigError("missing group name".to_string()));
    }
    Ok(())
}

fn ensure_has_commands(cfg: &RawGroupConfig) -> Result<()> {
    if cfg.commands.is_empty() {
        return Err(CmdGroupError::ConfigError(format!(
            "group '{}' must contain at least one [[command]] entry",
            cfg.name
        )));
    }
    Ok(())
}

fn validate_commands(cfg: &RawGroupConfig) -> Result<()> {
    let mut names = HashSet::new();
    for (i, cmd) in cfg.commands.iter().enumerate() {
        if cmd.command.trim().is_empty() {
            return Err(CmdGroupError::ConfigError(format!(
                "command no. {i} in group '{}' is missing its command text",
                cfg.name
            )));
        }
        if !cmd.name.is_empty() && !names.insert(cmd.name.as_str()) {
            return Err(CmdGroupError::DuplicateName(cmd.name.clone()));
        }
    }
    Ok(())
}

/// Reject dependency cycles; they would leave every command on the cycle
/// waiting forever.
///
/// Unknown names and self references are skipped here: the scheduler
/// reports those itself when it first checks the command.
fn validate_no_cycles(cfg: &RawGroupConfig) -> Result<()> {
    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    let known: HashSet<&str> = cfg
        .commands
        .iter()
        .filter(|c| !c.name.is_empty())
        .map(|c| c.name.as_str())
        .collect();

    for name in &known {
        graph.add_node(*name);
    }

    for cmd in cfg.commands.iter().filter(|c| !c.name.is_empty()) {
        for dep in &cmd.depends_on {
            if dep != &cmd.name && known.contains(dep.as_str()) {
                graph.add_edge(dep.as_str(), cmd.name.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_) => Ok(()),
        Err(cycle) => Err(CmdGroupError::DependencyCycle(format!(
            "cycle detected in group '{}' involving command '{}'",
            cfg.name,
            cycle.node_id()
        ))),
    }
}

/// Checks across all loaded groups: unique names, none reserved.
pub fn validate_groups(groups: &[GroupConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for group in groups {
        if RESERVED_NAMES.contains(&group.name.as_str()) {
            return Err(CmdGroupError::ConfigError(format!(
                "reserved name used for a group: '{}'",
                group.name
            )));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(CmdGroupError::ConfigError(format!(
                "duplicate group name: '{}'",
                group.name
            )));
        }
    }
    Ok(())
}
