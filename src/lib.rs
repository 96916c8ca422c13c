// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod group;
pub mod logging;
pub mod output;
mod sync;
pub mod types;

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, CliCommand};
use crate::config::{GroupConfig, build_group, default_config_dir, load_dir};
use crate::output::OutputSink;

/// Exit code used when a second Ctrl-C forces the process down.
const FORCED_EXIT_CODE: i32 = 130;

/// High-level entry point used by `main.rs`.
///
/// Loads every group from the config directory, then dispatches on the
/// subcommand.
pub async fn run(args: CliArgs) -> Result<()> {
    let dir = args.config_dir.clone().unwrap_or_else(default_config_dir);
    let groups = load_dir(&dir)
        .with_context(|| format!("loading groups from {}", dir.display()))?;
    debug!(dir = %dir.display(), groups = groups.len(), "loaded group configs");

    match &args.command {
        CliCommand::List => {
            print_groups(&dir, &groups);
            Ok(())
        }
        CliCommand::Check { name } => {
            let cfg = find_group(&groups, name, &dir)?;
            // Building expands directories and compiles patterns; nothing runs.
            build_group(cfg, &OutputSink::stdout(), false)
                .with_context(|| format!("checking group {name:?}"))?;
            print_check(cfg);
            Ok(())
        }
        CliCommand::Run { name } => {
            let cfg = find_group(&groups, name, &dir)?;
            let colorize = use_color(args.no_color);
            let group = build_group(cfg, &OutputSink::stdout(), colorize)
                .with_context(|| format!("building group {name:?}"))?;

            spawn_force_exit();
            info!(group = %cfg.name, commands = group.len(), colorize, "running group");
            group
                .run_until_signal()
                .await
                .with_context(|| format!("running group {name:?}"))
        }
    }
}

fn find_group<'a>(groups: &'a [GroupConfig], name: &str, dir: &Path) -> Result<&'a GroupConfig> {
    match groups.iter().find(|g| g.name == name) {
        Some(cfg) => Ok(cfg),
        None => bail!("no group named {name:?} in {}", dir.display()),
    }
}

/// Colour only for a terminal, and only if neither `--no-color` nor
/// `NO_COLOR` asks otherwise.
fn use_color(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// The first Ctrl-C interrupts the group. A second one means the user is
/// done waiting.
fn spawn_force_exit() {
    tokio::spawn(async {
        for _ in 0..2 {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
        }
        eprintln!("cmdgroup: second interrupt, exiting without waiting for commands");
        std::process::exit(FORCED_EXIT_CODE);
    });
}

fn print_groups(dir: &Path, groups: &[GroupConfig]) {
    if groups.is_empty() {
        println!("no groups in {}", dir.display());
        return;
    }
    let width = groups.iter().map(|g| g.name.len()).max().unwrap_or(0);
    for g in groups {
        if g.description.is_empty() {
            println!("{}", g.name);
        } else {
            println!("{:<width$}  {}", g.name, g.description);
        }
    }
}

fn print_check(cfg: &GroupConfig) {
    println!("cmdgroup check: {}", cfg.name);
    println!("  shell = {}", cfg.shell);
    if !cfg.description.is_empty() {
        println!("  description = {}", cfg.description);
    }
    println!();

    println!("commands ({}):", cfg.commands.len());
    for (i, cmd) in cfg.commands.iter().enumerate() {
        if cmd.name.is_empty() {
            println!("  - (anonymous #{i})");
        } else {
            println!("  - {}", cmd.name);
        }
        println!("      command: {}", cmd.command);
        if let Some(ref dir) = cmd.directory {
            println!("      directory: {dir}");
        }
        if !cmd.depends_on.is_empty() {
            println!("      depends_on: {:?}", cmd.depends_on);
        }
        if let Some(ref re) = cmd.ready_regexp {
            println!("      ready_regexp: {re}");
        }
        if cmd.silence {
            println!("      silence: true");
        }
        if !cmd.environment.is_empty() {
            let keys: Vec<&str> = cmd.environment.keys().map(String::as_str).collect();
            println!("      environment: {keys:?}");
        }
    }

    debug!("check complete (no execution)");
}
