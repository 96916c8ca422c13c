// src/config/build.rs

use crate::config::model::{CommandConfig, GroupConfig};
use crate::errors::Result;
use crate::exec::{CommandSpec, ProcessUnit};
use crate::group::Group;
use crate::output::OutputSink;
use crate::output::palette::color_for;

/// Turn a validated group config into a ready-to-run [`Group`].
///
/// Directories are expanded and checked and ready patterns compiled here, so
/// configuration mistakes surface before any process starts. With
/// `colorize`, named commands get a label colour picked by their position.
pub fn build_group(cfg: &GroupConfig, sink: &OutputSink, colorize: bool) -> Result<Group> {
    let mut units = Vec::with_capacity(cfg.commands.len());
    for (i, cmd) in cfg.commands.iter().enumerate() {
        let spec = command_spec(cfg, cmd, i, colorize);
        let unit = ProcessUnit::new(spec, sink.clone())
            .map_err(|e| e.for_command(&display_name(cmd, i)))?;
        units.push(unit);
    }
    Group::from_units(units)
}

fn command_spec(cfg: &GroupConfig, cmd: &CommandConfig, index: usize, colorize: bool) -> CommandSpec {
    CommandSpec {
        name: cmd.name.clone(),
        shell: cfg.shell,
        command: cmd.command.clone(),
        directory: cmd.directory.clone().filter(|d| !d.is_empty()),
        environment: cmd.environment.clone(),
        silent: cmd.silence,
        ready_pattern: cmd.ready_regexp.clone().filter(|p| !p.is_empty()),
        depends_on: cmd.depends_on.clone(),
        color: (colorize && !cmd.name.is_empty()).then(|| color_for(index)),
    }
}

fn display_name(cmd: &CommandConfig, index: usize) -> String {
    if cmd.name.is_empty() {
        format!("command no. {index}")
    } else {
        cmd.name.clone()
    }
}
