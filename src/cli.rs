// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::loader::CONFIG_DIR_ENV;

/// Command-line arguments for `cmdgroup`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cmdgroup",
    version,
    about = "Run a group of interdependent shell commands in one terminal.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory holding group configs (`*.toml`).
    ///
    /// Default: `~/.config/cmdgroup`.
    #[arg(long, value_name = "DIR", env = CONFIG_DIR_ENV, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CMDGROUP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Never colour command name prefixes.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run the named group until every command exits or Ctrl-C is pressed.
    Run {
        /// Group name (the `name` field of a config file).
        name: String,
    },
    /// List configured groups.
    #[command(alias = "ls")]
    List,
    /// Parse, validate and build a group, print it, but run nothing.
    Check {
        name: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_global_flags() {
        let args = CliArgs::try_parse_from([
            "cmdgroup",
            "--no-color",
            "run",
            "dev",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(args.no_color);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(matches!(args.command, CliCommand::Run { ref name } if name == "dev"));
    }

    #[test]
    fn ls_is_an_alias_for_list() {
        let args = CliArgs::try_parse_from(["cmdgroup", "ls"]).unwrap();
        assert!(matches!(args.command, CliCommand::List));
    }

    #[test]
    fn run_requires_a_name() {
        assert!(CliArgs::try_parse_from(["cmdgroup", "run"]).is_err());
    }
}
