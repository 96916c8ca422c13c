// src/logging.rs

//! Logging setup for `cmdgroup` using `tracing` + `tracing-subscriber`.
//!
//! Level priority: `--log-level`, then `CMDGROUP_LOG`, then `warn`.
//!
//! The default is `warn` because stdout carries the multiplexed output of
//! every command in the group. Diagnostics go to stderr and stay quiet
//! unless asked for, so they never crowd the prefixed command lines.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable read when `--log-level` is absent.
pub const LOG_ENV: &str = "CMDGROUP_LOG";

const DEFAULT_LEVEL: Level = Level::WARN;

/// Install the global stderr subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_level = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, env_level.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}

/// Pick the effective level. An unparsable env value falls back to the
/// default rather than failing startup.
fn resolve_level(cli_level: Option<LogLevel>, env_level: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return lvl.into();
    }
    env_level.and_then(parse_level).unwrap_or(DEFAULT_LEVEL)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env() {
        assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), Level::TRACE);
    }

    #[test]
    fn env_is_used_without_flag() {
        assert_eq!(resolve_level(None, Some(" Debug ")), Level::DEBUG);
        assert_eq!(resolve_level(None, Some("warning")), Level::WARN);
    }

    #[test]
    fn default_keeps_stdout_quiet() {
        assert_eq!(resolve_level(None, None), Level::WARN);
        assert_eq!(resolve_level(None, Some("loud")), Level::WARN);
    }
}
