#![allow(dead_code)]

use std::collections::BTreeMap;

use cmdgroup::config::{CommandConfig, GroupConfig, RawGroupConfig};
use cmdgroup::errors::Result;
use cmdgroup::exec::{CommandSpec, ProcessUnit};
use cmdgroup::output::{OutputSink, SharedBuffer};
use cmdgroup::types::Shell;

/// Builder for `CommandSpec`. Always uses `sh` unless told otherwise.
pub struct CommandSpecBuilder {
    spec: CommandSpec,
}

impl CommandSpecBuilder {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            spec: CommandSpec {
                name: name.to_string(),
                shell: Shell::Sh,
                ..CommandSpec::new(command)
            },
        }
    }

    /// A command with no name; its output is not prefixed.
    pub fn anonymous(command: &str) -> Self {
        Self::new("", command)
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.spec.depends_on.push(dep.to_string());
        self
    }

    pub fn silent(mut self) -> Self {
        self.spec.silent = true;
        self
    }

    pub fn ready_pattern(mut self, pattern: &str) -> Self {
        self.spec.ready_pattern = Some(pattern.to_string());
        self
    }

    pub fn directory(mut self, dir: &str) -> Self {
        self.spec.directory = Some(dir.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.spec
            .environment
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn shell(mut self, shell: Shell) -> Self {
        self.spec.shell = shell;
        self
    }

    pub fn build(self) -> CommandSpec {
        self.spec
    }

    /// Build a unit writing into `sink`.
    pub fn unit(self, sink: &OutputSink) -> Result<ProcessUnit> {
        ProcessUnit::new(self.spec, sink.clone())
    }

    /// Build a unit with its own captured output buffer.
    pub fn captured_unit(self) -> (ProcessUnit, SharedBuffer) {
        let (sink, buf) = OutputSink::buffer();
        let unit = self.unit(&sink).expect("valid command spec");
        (unit, buf)
    }
}

/// Builder for `GroupConfig`, the validated form of one config file.
pub struct GroupConfigBuilder {
    raw: RawGroupConfig,
}

impl GroupConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            raw: RawGroupConfig {
                name: name.to_string(),
                shell: Shell::Sh,
                description: String::new(),
                commands: Vec::new(),
            },
        }
    }

    pub fn description(mut self, text: &str) -> Self {
        self.raw.description = text.to_string();
        self
    }

    pub fn shell(mut self, shell: Shell) -> Self {
        self.raw.shell = shell;
        self
    }

    pub fn command(self, name: &str, command: &str) -> Self {
        self.command_with(command_config(name, command))
    }

    pub fn command_with(mut self, cmd: CommandConfig) -> Self {
        self.raw.commands.push(cmd);
        self
    }

    pub fn raw(self) -> RawGroupConfig {
        self.raw
    }

    pub fn try_build(self) -> Result<GroupConfig> {
        GroupConfig::try_from(self.raw)
    }

    pub fn build(self) -> GroupConfig {
        self.try_build()
            .expect("Failed to build valid group config from builder")
    }
}

/// A `[[command]]` entry with only a name and command text.
pub fn command_config(name: &str, command: &str) -> CommandConfig {
    CommandConfig {
        name: name.to_string(),
        command: command.to_string(),
        directory: None,
        silence: false,
        ready_regexp: None,
        depends_on: Vec::new(),
        environment: BTreeMap::new(),
    }
}
